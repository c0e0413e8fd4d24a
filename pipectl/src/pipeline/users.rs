//! Pipeline access management

use openapi_client::models::{PipelineUser, PipelineUserRequest};

use crate::errors::PipelineError;
use crate::http::Session;
use crate::pipeline::{decode_list, PipelineClient};

impl PipelineClient {
    pub async fn get_pipeline_users(
        &self,
        session: Session<'_>,
    ) -> Result<Vec<PipelineUser>, PipelineError> {
        let raw = session.get(&self.path("/users")).await?;
        decode_list(raw)
    }

    /// Grant a principal access, or change the access it already has
    pub async fn update_pipeline_user(
        &self,
        session: Session<'_>,
        request: &PipelineUserRequest,
    ) -> Result<(), PipelineError> {
        let body = serde_json::to_value(request)?;
        session.post(&self.path("/users"), Some(&body)).await?;
        Ok(())
    }

    /// Revoke access; `identifier` is a user principal name or object id
    pub async fn delete_pipeline_user(
        &self,
        session: Session<'_>,
        identifier: &str,
    ) -> Result<(), PipelineError> {
        session
            .delete(&self.path(&format!("/users/{}", urlencoding::encode(identifier))))
            .await?;
        Ok(())
    }
}
