//! Transport seam between pipeline operations and the wire

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;

use crate::errors::PipelineError;

/// JSON request/response transport.
///
/// `path` is relative to the API base URL and starts with `/`. A success
/// response with an empty body is returned as `Value::Null`.
#[async_trait]
pub trait PipelineApi: Send + Sync {
    async fn get(&self, path: &str, token: &SecretString) -> Result<Value, PipelineError>;

    async fn post(
        &self,
        path: &str,
        token: &SecretString,
        body: Option<&Value>,
    ) -> Result<Value, PipelineError>;

    async fn patch(
        &self,
        path: &str,
        token: &SecretString,
        body: &Value,
    ) -> Result<Value, PipelineError>;

    async fn delete(&self, path: &str, token: &SecretString) -> Result<Value, PipelineError>;
}

/// A transport paired with the credential to present on every call.
///
/// Passed to each operation instead of being stored on the pipeline handle.
#[derive(Clone, Copy)]
pub struct Session<'a> {
    pub api: &'a dyn PipelineApi,
    pub token: &'a SecretString,
}

impl<'a> Session<'a> {
    pub fn new(api: &'a dyn PipelineApi, token: &'a SecretString) -> Self {
        Self { api, token }
    }

    pub async fn get(&self, path: &str) -> Result<Value, PipelineError> {
        self.api.get(path, self.token).await
    }

    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<Value, PipelineError> {
        self.api.post(path, self.token, body).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, PipelineError> {
        self.api.patch(path, self.token, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, PipelineError> {
        self.api.delete(path, self.token).await
    }
}
