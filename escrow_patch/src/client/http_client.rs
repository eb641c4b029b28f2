//! HTTP transport for the records API
//!
//! Wraps a pooled `reqwest::Client` configured from [`ApiConfig`]. Patches
//! are sent as `PUT` with a JSON body, record loads as `GET`.

use async_trait::async_trait;
use error_stack::Report;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use super::PatchTransport;
use super::types::ApiResponse;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::patch::{Endpoint, Patch};

/// `reqwest` backed [`PatchTransport`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    http:   Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Build a client; the config is validated first
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Report::new(Error::failed_to("build HTTP client", e)))?;
        Ok(Self { http, config })
    }

    /// Configuration in use
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Absolute URL of an endpoint
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    async fn execute(&self, request: RequestBuilder, method: &str, url: &str) -> Result<ApiResponse> {
        let request = match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| Self::handle_error(&e, method, url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::handle_error(&e, method, url))?;

        debug!("{method} {url} -> {status}");
        ApiResponse::from_http(status, &body)
            .map_err(|report| report.attach(format!("Request: {method} {url}")))
    }

    /// Translate a `reqwest` failure into a transport error with context
    fn handle_error(e: &reqwest::Error, method: &str, url: &str) -> Report<Error> {
        warn!("{method} {url} failed: {e}");

        let error_type = if e.is_timeout() {
            "Timeout"
        } else if e.is_connect() {
            "Connection failed"
        } else if e.is_request() {
            "Request error"
        } else if e.is_body() {
            "Body error"
        } else if e.is_decode() {
            "Decode error"
        } else {
            "Network error"
        };

        Report::new(Error::transport(format!("{error_type}: {e}"), None))
            .attach(format!("Request: {method} {url}"))
            .attach(format!("Full error: {e:?}"))
    }
}

#[async_trait]
impl PatchTransport for ApiClient {
    async fn send(&self, patch: &Patch) -> Result<ApiResponse> {
        let url = self.url(&patch.endpoint);
        debug!("PUT {url} body={}", patch.body);
        self.execute(self.http.put(&url).json(&patch.body), "PUT", &url)
            .await
    }

    async fn fetch(&self, endpoint: &Endpoint) -> Result<ApiResponse> {
        let url = self.url(endpoint);
        self.execute(self.http.get(&url), "GET", &url).await
    }
}
