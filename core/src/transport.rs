//! The IO seam: hosts implement `Transport`, controllers talk to a `Gateway`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::client::AdminClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, RequestDescriptor};

/// Executes an `HttpRequest` built by the core and returns the raw response.
///
/// Implementations report non-2xx statuses as data, not as `Err`; only a
/// failed round-trip (connection refused, timeout) is an `ApiError::Transport`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// An `AdminClient` bound to a transport.
#[derive(Clone)]
pub struct Gateway {
    client: AdminClient,
    transport: Arc<dyn Transport>,
}

impl Gateway {
    pub fn new(client: AdminClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &AdminClient {
        &self.client
    }

    /// Build, execute and parse one request.
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<Value, ApiError> {
        let request = self.client.build(descriptor)?;
        debug!(method = %request.method, path = %request.path, "dispatching");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "response received");
        self.client.parse(response)
    }
}
