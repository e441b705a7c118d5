//! # Inbound Ports (Driving Ports / API)
//!
//! The single operation this service offers: request an update of a source.

use crate::domain::outcome::UpdateOutcome;
use async_trait::async_trait;

/// Raw inputs of one update request, as received from the transport.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    /// Value of the `Authorization` header, if present and textual
    pub authorization: Option<String>,
    /// Source id path parameter, if present
    pub source_id: Option<String>,
}

impl UpdateRequest {
    pub fn new(authorization: Option<String>, source_id: Option<String>) -> Self {
        Self {
            authorization,
            source_id,
        }
    }
}

/// Source update API.
///
/// Implementations never fail: every error is folded into an
/// [`UpdateOutcome`].
#[async_trait]
pub trait SourceUpdateApi: Send + Sync {
    /// Authenticate, check the source exists, and queue an incremental update.
    async fn request_update(&self, request: UpdateRequest) -> UpdateOutcome;
}
