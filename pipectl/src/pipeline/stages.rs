//! Stage listing and workspace assignment

use openapi_client::models::{AssignWorkspaceRequest, PipelineStage, StageArtifacts};
use tracing::info;

use crate::errors::PipelineError;
use crate::http::Session;
use crate::pipeline::{decode, decode_list, PipelineClient};

impl PipelineClient {
    pub async fn get_pipeline_stages(
        &self,
        session: Session<'_>,
    ) -> Result<Vec<PipelineStage>, PipelineError> {
        let raw = session.get(&self.path("/stages")).await?;
        decode_list(raw)
    }

    /// Content deployed to the stage at `stage_order`
    pub async fn get_pipeline_stage_artifacts(
        &self,
        session: Session<'_>,
        stage_order: u32,
    ) -> Result<StageArtifacts, PipelineError> {
        let raw = session
            .get(&self.path(&format!("/stages/{}/artifacts", stage_order)))
            .await?;
        decode(raw)
    }

    pub async fn assign_workspace(
        &self,
        session: Session<'_>,
        stage_order: u32,
        workspace_id: &str,
    ) -> Result<(), PipelineError> {
        info!(
            "Assigning workspace {} to stage {} of pipeline {}",
            workspace_id,
            stage_order,
            self.id()
        );
        let body = serde_json::to_value(AssignWorkspaceRequest {
            workspace_id: workspace_id.to_string(),
        })?;
        session
            .post(
                &self.path(&format!("/stages/{}/assignWorkspace", stage_order)),
                Some(&body),
            )
            .await?;
        Ok(())
    }

    pub async fn unassign_workspace(
        &self,
        session: Session<'_>,
        stage_order: u32,
    ) -> Result<(), PipelineError> {
        info!(
            "Unassigning workspace from stage {} of pipeline {}",
            stage_order,
            self.id()
        );
        session
            .post(
                &self.path(&format!("/stages/{}/unassignWorkspace", stage_order)),
                None,
            )
            .await?;
        Ok(())
    }
}
