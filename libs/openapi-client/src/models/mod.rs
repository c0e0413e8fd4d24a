//! API models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// OData collection envelope returned by every listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ODataList<T> {
    #[serde(rename = "@odata.context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub value: Vec<T>,
}

/// A deployment pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Only populated when the pipeline was fetched with `$expand=stages`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<PipelineStage>,
}

/// One ordered slot of a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStage {
    pub order: u32,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub workspace_name: Option<String>,
}

impl PipelineStage {
    pub fn is_assigned(&self) -> bool {
        self.workspace_id.is_some()
    }
}

/// A principal with access to a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineUser {
    pub identifier: String,
    #[serde(default)]
    pub principal_type: Option<String>,
    #[serde(default)]
    pub access_right: Option<String>,
}

/// Content of a single stage, grouped by artifact kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageArtifacts {
    #[serde(default)]
    pub dashboards: Vec<Value>,
    #[serde(default)]
    pub dataflows: Vec<Value>,
    #[serde(default)]
    pub datamarts: Vec<Value>,
    #[serde(default)]
    pub datasets: Vec<Value>,
    #[serde(default)]
    pub reports: Vec<Value>,
}

/// Status reported when the service omits one
pub const UNKNOWN_STATUS: &str = "Unknown";

/// A deployment operation as reported by the service.
///
/// Fields the client does not model are kept in `extra` so the record
/// serializes back to what the service sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PipelineOperation {
    /// Status string, or [`UNKNOWN_STATUS`] when absent
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or(UNKNOWN_STATUS)
    }
}

/// Body of `POST /stages/{order}/assignWorkspace`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignWorkspaceRequest {
    pub workspace_id: String,
}

/// Body of `PATCH /pipelines/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePipelineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `POST /pipelines/{id}/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineUserRequest {
    pub identifier: String,
    pub principal_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_right: Option<String>,
}

/// Body of `POST /pipelines/{id}/deployAll`.
///
/// Optional fields are left out of the JSON when unset; the service reads
/// an explicit `null` differently from an absent key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub source_stage_order: u32,
    #[serde(default)]
    pub is_backward_deployment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_workspace: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_app_settings: Option<Value>,
}

impl DeployRequest {
    /// Forward deployment out of `source_stage_order` with nothing else set
    pub fn new(source_stage_order: u32) -> Self {
        Self {
            source_stage_order,
            is_backward_deployment: false,
            new_workspace: None,
            note: None,
            options: None,
            update_app_settings: None,
        }
    }

    #[must_use]
    pub fn with_backward_deployment(mut self, is_backward: bool) -> Self {
        self.is_backward_deployment = is_backward;
        self
    }

    #[must_use]
    pub fn with_new_workspace(mut self, new_workspace: Value) -> Self {
        self.new_workspace = Some(new_workspace);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn with_update_app_settings(mut self, update_app_settings: Value) -> Self {
        self.update_app_settings = Some(update_app_settings);
        self
    }
}

/// Body of `POST /pipelines/{id}/deploy`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectiveDeployRequest {
    #[serde(flatten)]
    pub deploy: DeployRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboards: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataflows: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datamarts: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<Value>>,
}

impl SelectiveDeployRequest {
    pub fn new(source_stage_order: u32) -> Self {
        DeployRequest::new(source_stage_order).into()
    }

    #[must_use]
    pub fn with_dashboards(mut self, dashboards: Vec<Value>) -> Self {
        self.dashboards = Some(dashboards);
        self
    }

    #[must_use]
    pub fn with_dataflows(mut self, dataflows: Vec<Value>) -> Self {
        self.dataflows = Some(dataflows);
        self
    }

    #[must_use]
    pub fn with_datamarts(mut self, datamarts: Vec<Value>) -> Self {
        self.datamarts = Some(datamarts);
        self
    }

    #[must_use]
    pub fn with_datasets(mut self, datasets: Vec<Value>) -> Self {
        self.datasets = Some(datasets);
        self
    }

    #[must_use]
    pub fn with_reports(mut self, reports: Vec<Value>) -> Self {
        self.reports = Some(reports);
        self
    }
}

impl From<DeployRequest> for SelectiveDeployRequest {
    fn from(deploy: DeployRequest) -> Self {
        Self {
            deploy,
            dashboards: None,
            dataflows: None,
            datamarts: None,
            datasets: None,
            reports: None,
        }
    }
}
