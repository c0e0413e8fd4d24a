//! Resolved client configuration

use std::time::Duration;

use secrecy::SecretString;

use crate::deploy::waiter::WaitOptions;
use crate::errors::PipelineError;
use crate::http::client::{HttpClient, DEFAULT_TIMEOUT};
use crate::storage::settings::{BackendSettings, Settings};

/// Overrides `backend.base_url`
pub const BASE_URL_ENV: &str = "PIPECTL_BASE_URL";

/// Bearer token presented to the API
pub const ACCESS_TOKEN_ENV: &str = "PIPECTL_ACCESS_TOKEN";

/// Client options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// API base URL, without the `/pipelines` suffix
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Deploy-and-wait polling
    pub wait: WaitOptions,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: BackendSettings::default().base_url,
            timeout: DEFAULT_TIMEOUT,
            wait: WaitOptions::default(),
        }
    }
}

impl ClientOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            base_url: settings.backend.base_url.clone(),
            timeout: Duration::from_secs(settings.backend.timeout_secs),
            wait: WaitOptions {
                interval: Duration::from_secs(settings.polling_interval_secs),
                max_wait: settings.max_wait_secs.map(Duration::from_secs),
            },
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = base_url;
        }
        self
    }

    pub fn http_client(&self) -> Result<HttpClient, PipelineError> {
        HttpClient::with_timeout(&self.base_url, self.timeout)
    }
}

/// Read the access token from [`ACCESS_TOKEN_ENV`]
pub fn access_token_from_env() -> Result<SecretString, PipelineError> {
    match std::env::var(ACCESS_TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => Ok(SecretString::from(token)),
        _ => Err(PipelineError::ConfigError(format!(
            "{} is not set",
            ACCESS_TOKEN_ENV
        ))),
    }
}
