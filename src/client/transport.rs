use async_trait::async_trait;
use bytes::Bytes;

use crate::client::FetchError;
use crate::resource::ResourceRequest;

/// What came back over the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: Bytes::from(body.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The seam between the controller and the network.
///
/// Implementations perform exactly one call per `execute` and report only
/// transport failures as errors; HTTP statuses are left to the caller.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn execute(&self, request: &ResourceRequest) -> Result<RawResponse, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: &ResourceRequest) -> Result<RawResponse, FetchError> {
        (**self).execute(request).await
    }
}
