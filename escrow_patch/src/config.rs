//! API client configuration
//!
//! Configuration is passed explicitly to [`crate::client::ApiClient::new`];
//! nothing in the engine reads the environment on its own.

use std::path::Path;
use std::time::Duration;

use error_stack::Report;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, ENV_API_TIMEOUT_SECS, ENV_API_TOKEN,
    ENV_API_URL,
};
use crate::error::{Error, Result};

/// Connection settings for the records API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL that endpoint paths are appended to
    pub base_url:     String,
    /// Bearer token sent as `Authorization: Bearer <token>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token:   Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url:     DEFAULT_API_BASE_URL.to_string(),
            auth_token:   None,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Default configuration pointed at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Attach a bearer token
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Request timeout as a [`Duration`]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Defaults overridden by `ESCROW_API_URL`, `ESCROW_API_TOKEN` and
    /// `ESCROW_API_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the environment keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        config.auth_token = lookup(ENV_API_TOKEN).filter(|token| !token.trim().is_empty());
        if let Some(raw) = lookup(ENV_API_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse::<u64>().map_err(|e| {
                Report::new(Error::Configuration(format!(
                    "{ENV_API_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                )))
                .attach(format!("Parse error: {e}"))
            })?;
        }
        config.validate()?;
        debug!("API config from environment: base_url={}", config.base_url);
        Ok(config)
    }

    /// Load from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Report::new(Error::io_failed("read config", path, e)))?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            Report::new(Error::Configuration(format!("Invalid JSON config: {e}")))
                .attach(format!("Path: {}", path.display()))
        })?;
        config.validate()?;
        debug!(
            "API config loaded from {}: base_url={}",
            path.display(),
            config.base_url
        );
        Ok(config)
    }

    /// Reject configurations that cannot produce a working client
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Report::new(Error::Configuration(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            ))));
        }
        if self.timeout_secs == 0 {
            return Err(Report::new(Error::Configuration(
                "timeout_secs must be greater than zero".to_string(),
            )));
        }
        Ok(())
    }
}
