//! Deployment pipeline resource
//!
//! [`PipelineClient`] carries only the pipeline id and the paths derived from
//! it. Every operation takes a [`Session`] so the transport and credential
//! stay with the caller.

pub mod deployments;
pub mod stages;
pub mod users;

use openapi_client::models::{ODataList, Pipeline, UpdatePipelineRequest};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::errors::PipelineError;
use crate::http::Session;

/// Collection path for all pipelines
pub const PIPELINES_PATH: &str = "/pipelines";

/// Handle on one deployment pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineClient {
    id: String,
    resource_path: String,
}

impl PipelineClient {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let resource_path = format!("{}/{}", PIPELINES_PATH, urlencoding::encode(&id));
        Self { id, resource_path }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `/pipelines/{id}` with the id percent-encoded, relative to the API base URL
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    pub(crate) fn path(&self, suffix: &str) -> String {
        format!("{}{}", self.resource_path, suffix)
    }

    /// Fetch the pipeline with its stages expanded
    pub async fn get_pipeline(&self, session: Session<'_>) -> Result<Pipeline, PipelineError> {
        let raw = session.get(&self.path("?$expand=stages")).await?;
        decode(raw)
    }

    /// Update the display name and/or description.
    ///
    /// Only the fields set on `request` are sent.
    pub async fn update_pipeline(
        &self,
        session: Session<'_>,
        request: &UpdatePipelineRequest,
    ) -> Result<(), PipelineError> {
        let body = serde_json::to_value(request)?;
        session.patch(&self.resource_path, &body).await?;
        Ok(())
    }

    pub async fn delete_pipeline(&self, session: Session<'_>) -> Result<(), PipelineError> {
        info!("Deleting pipeline {}", self.id);
        session.delete(&self.resource_path).await?;
        Ok(())
    }
}

/// List every pipeline the credential has access to
pub async fn list_pipelines(session: Session<'_>) -> Result<Vec<Pipeline>, PipelineError> {
    let raw = session.get(PIPELINES_PATH).await?;
    decode_list(raw)
}

pub(crate) fn decode<T: DeserializeOwned>(raw: Value) -> Result<T, PipelineError> {
    Ok(serde_json::from_value(raw)?)
}

pub(crate) fn decode_list<T: DeserializeOwned>(raw: Value) -> Result<Vec<T>, PipelineError> {
    let list: ODataList<T> = serde_json::from_value(raw)?;
    Ok(list.value)
}
