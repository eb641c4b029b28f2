//! Transport seam between the editor and the records API

mod http_client;
mod types;

use async_trait::async_trait;
pub use http_client::ApiClient;
pub use types::{ApiError, ApiResponse};

use crate::error::Result;
use crate::patch::{Endpoint, Patch};

/// Sends patches and loads records
///
/// Implementations return [`crate::error::Error::Transport`] for network
/// failures, non-2xx statuses and `success: false` envelopes.
#[async_trait]
pub trait PatchTransport: Send + Sync {
    /// `PUT` the patch body to its endpoint
    async fn send(&self, patch: &Patch) -> Result<ApiResponse>;

    /// `GET` an endpoint
    async fn fetch(&self, endpoint: &Endpoint) -> Result<ApiResponse>;
}
