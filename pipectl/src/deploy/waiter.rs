//! Polling state machine for deployment operations

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use openapi_client::models::PipelineOperation;
use tracing::{debug, error, info};

use crate::errors::PipelineError;
use crate::http::Session;
use crate::pipeline::PipelineClient;

/// Wait settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    /// Delay between status fetches
    pub interval: Duration,

    /// Upper bound on the total time spent sleeping between fetches.
    /// The last sleep is shortened so the sum never exceeds it.
    ///
    /// Only sleep time counts; time spent in status fetches does not, and
    /// each fetch is bounded by the HTTP client timeout instead. `None`
    /// polls until the operation is terminal.
    pub max_wait: Option<Duration>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            max_wait: None,
        }
    }
}

/// Where an operation stands, as far as the waiter is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    /// Anything other than the two terminal statuses, including a missing one
    Pending,

    Succeeded,

    Failed,
}

impl OperationState {
    pub fn from_status(status: &str) -> Self {
        match status {
            "Succeeded" => OperationState::Succeeded,
            "Failed" => OperationState::Failed,
            _ => OperationState::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationState::Pending)
    }
}

/// Poll `operation_id` until it succeeds or fails.
///
/// The first fetch happens right away; after that `sleep_fn(interval)` runs
/// between fetches. Resolving `cancel` during a sleep aborts the wait.
pub async fn wait_for_operation<S, F>(
    pipeline: &PipelineClient,
    session: Session<'_>,
    operation_id: &str,
    options: &WaitOptions,
    sleep_fn: S,
    mut cancel: Pin<Box<dyn Future<Output = ()> + Send + '_>>,
) -> Result<PipelineOperation, PipelineError>
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let mut waited = Duration::ZERO;
    let mut polls: u32 = 0;

    loop {
        let operation = pipeline
            .get_pipeline_operation(session, operation_id)
            .await?;
        polls += 1;

        match OperationState::from_status(operation.status()) {
            OperationState::Succeeded => {
                info!(
                    "Deployment operation {} succeeded after {} polls",
                    operation_id, polls
                );
                return Ok(operation);
            }
            OperationState::Failed => {
                error!(
                    "Deployment operation {} failed after {} polls",
                    operation_id, polls
                );
                return Err(PipelineError::DeploymentFailed {
                    operation: Box::new(operation),
                });
            }
            OperationState::Pending => {
                debug!(
                    "Deployment operation {} is {} (poll {})",
                    operation_id,
                    operation.status(),
                    polls
                );
            }
        }

        let mut nap = options.interval;
        if let Some(max_wait) = options.max_wait {
            if waited >= max_wait {
                return Err(PipelineError::WaitTimeout {
                    operation_id: operation_id.to_string(),
                    waited,
                    last: Box::new(operation),
                });
            }
            nap = nap.min(max_wait - waited);
        }

        tokio::select! {
            _ = &mut cancel => {
                info!("Stopped waiting for deployment operation {}", operation_id);
                return Err(PipelineError::WaitCancelled {
                    operation_id: operation_id.to_string(),
                });
            }
            _ = sleep_fn(nap) => {}
        }
        waited += nap;
    }
}
