//! HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::errors::PipelineError;
use crate::http::api::PipelineApi;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest-backed transport for the pipelines API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client with the default timeout
    pub fn new(base_url: &str) -> Result<Self, PipelineError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new HTTP client with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, PipelineError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| PipelineError::ConfigError(format!("Invalid base URL {}: {}", base_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(PipelineError::ConfigError(format!(
                "Base URL must use http or https, got: {}",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: &SecretString,
        body: Option<&Value>,
    ) -> Result<Value, PipelineError> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url).header(
            header::AUTHORIZATION,
            format!("Bearer {}", token.expose_secret()),
        );
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} {} failed: {} - {}", method, url, status, body);
            return Err(PipelineError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl PipelineApi for HttpClient {
    async fn get(&self, path: &str, token: &SecretString) -> Result<Value, PipelineError> {
        self.send(Method::GET, path, token, None).await
    }

    async fn post(
        &self,
        path: &str,
        token: &SecretString,
        body: Option<&Value>,
    ) -> Result<Value, PipelineError> {
        self.send(Method::POST, path, token, body).await
    }

    async fn patch(
        &self,
        path: &str,
        token: &SecretString,
        body: &Value,
    ) -> Result<Value, PipelineError> {
        self.send(Method::PATCH, path, token, Some(body)).await
    }

    async fn delete(&self, path: &str, token: &SecretString) -> Result<Value, PipelineError> {
        self.send(Method::DELETE, path, token, None).await
    }
}
