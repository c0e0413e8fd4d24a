//! Deployment triggers and operation history

use std::future::pending;

use openapi_client::models::{DeployRequest, PipelineOperation, SelectiveDeployRequest};
use tracing::info;

use crate::deploy::waiter::{wait_for_operation, WaitOptions};
use crate::errors::PipelineError;
use crate::http::Session;
use crate::pipeline::{decode, decode_list, PipelineClient};

impl PipelineClient {
    /// Deploy all content of the source stage.
    ///
    /// Returns the trigger response, which carries the id of the
    /// long-running operation. The deployment itself is not awaited.
    pub async fn deploy_all(
        &self,
        session: Session<'_>,
        request: &DeployRequest,
    ) -> Result<PipelineOperation, PipelineError> {
        info!(
            "Triggering deploy of all content from stage {} of pipeline {}",
            request.source_stage_order,
            self.id()
        );
        let body = serde_json::to_value(request)?;
        let raw = session.post(&self.path("/deployAll"), Some(&body)).await?;
        decode(raw)
    }

    /// Deploy only the content items listed on `request`
    pub async fn selective_deploy(
        &self,
        session: Session<'_>,
        request: &SelectiveDeployRequest,
    ) -> Result<PipelineOperation, PipelineError> {
        info!(
            "Triggering selective deploy from stage {} of pipeline {}",
            request.deploy.source_stage_order,
            self.id()
        );
        let body = serde_json::to_value(request)?;
        let raw = session.post(&self.path("/deploy"), Some(&body)).await?;
        decode(raw)
    }

    /// [`deploy_all`](Self::deploy_all), then poll until the operation is terminal
    pub async fn deploy_all_and_wait(
        &self,
        session: Session<'_>,
        request: &DeployRequest,
        options: &WaitOptions,
    ) -> Result<PipelineOperation, PipelineError> {
        let triggered = self.deploy_all(session, request).await?;
        let operation_id = triggered.id.ok_or(PipelineError::MissingOperationId)?;
        self.wait_for_operation(session, &operation_id, options).await
    }

    /// [`selective_deploy`](Self::selective_deploy), then poll until the operation is terminal
    pub async fn selective_deploy_and_wait(
        &self,
        session: Session<'_>,
        request: &SelectiveDeployRequest,
        options: &WaitOptions,
    ) -> Result<PipelineOperation, PipelineError> {
        let triggered = self.selective_deploy(session, request).await?;
        let operation_id = triggered.id.ok_or(PipelineError::MissingOperationId)?;
        self.wait_for_operation(session, &operation_id, options).await
    }

    /// Poll an existing operation with tokio's timer and no cancellation
    pub async fn wait_for_operation(
        &self,
        session: Session<'_>,
        operation_id: &str,
        options: &WaitOptions,
    ) -> Result<PipelineOperation, PipelineError> {
        wait_for_operation(
            self,
            session,
            operation_id,
            options,
            tokio::time::sleep,
            Box::pin(pending::<()>()),
        )
        .await
    }

    pub async fn get_pipeline_operation(
        &self,
        session: Session<'_>,
        operation_id: &str,
    ) -> Result<PipelineOperation, PipelineError> {
        let raw = session
            .get(&self.path(&format!(
                "/operations/{}",
                urlencoding::encode(operation_id)
            )))
            .await?;
        decode(raw)
    }

    /// Deployment history, most recent first as returned by the service
    pub async fn get_pipeline_operations(
        &self,
        session: Session<'_>,
    ) -> Result<Vec<PipelineOperation>, PipelineError> {
        let raw = session.get(&self.path("/operations")).await?;
        decode_list(raw)
    }
}
