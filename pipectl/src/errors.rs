//! Error types for the pipeline client

use std::time::Duration;

use openapi_client::models::PipelineOperation;
use thiserror::Error;

/// Main error type for pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The deployment reached the `Failed` terminal state
    #[error("Deployment failed: operation {}", .operation.id.as_deref().unwrap_or("<unknown>"))]
    DeploymentFailed { operation: Box<PipelineOperation> },

    /// `max_wait` elapsed before the operation became terminal
    #[error("Timed out after {waited:?} waiting for operation {operation_id} (last status: {})", .last.status())]
    WaitTimeout {
        operation_id: String,
        waited: Duration,
        last: Box<PipelineOperation>,
    },

    #[error("Wait for operation {operation_id} was cancelled")]
    WaitCancelled { operation_id: String },

    /// The trigger response carried no operation id to poll
    #[error("Deploy response did not include an operation id")]
    MissingOperationId,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PipelineError {
    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            PipelineError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Terminal operation record of a failed deployment
    pub fn failed_operation(&self) -> Option<&PipelineOperation> {
        match self {
            PipelineError::DeploymentFailed { operation } => Some(operation),
            _ => None,
        }
    }
}
