//! # Workflow Outcomes
//!
//! Every boundary call and every request ends in one of these tagged results.
//! The request handler matches on them exhaustively, so each transition of
//! the update workflow is explicit.

use crate::domain::entities::{Principal, Source, SourceId};
use crate::domain::error::RegistryError;
use serde_json::{json, Value};

/// Why a request was not authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No `Authorization` header
    MissingHeader,
    /// Header present but not `Bearer <token>`
    MalformedHeader,
    /// Provider answered but resolved no identity
    TokenUnresolved,
    /// Provider call failed
    ProviderError,
}

/// Result of the authentication gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Authenticated(Principal),
    Rejected(RejectReason),
}

/// Result of a registry lookup.
#[derive(Debug)]
pub enum LookupOutcome {
    Found(Source),
    NotFound,
    Failed(RegistryError),
}

/// Result of publishing an update command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Queue acknowledged the message (accepted, not processed)
    Accepted { message_id: Option<String> },
    /// Queue did not acknowledge, or could not be reached
    Failed,
}

/// Terminal state of one update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// 401
    Unauthorized,
    /// 404
    SourceNotFound,
    /// 200
    UpdateRequested(SourceId),
    /// 500
    DispatchFailed(SourceId),
    /// 503
    RegistryUnavailable,
}

impl UpdateOutcome {
    /// HTTP status code for this outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::SourceNotFound => 404,
            Self::UpdateRequested(_) => 200,
            Self::DispatchFailed(_) => 500,
            Self::RegistryUnavailable => 503,
        }
    }

    /// Single-key JSON body for this outcome.
    pub fn body(&self) -> Value {
        match self {
            Self::Unauthorized => json!({ "error": "Unauthorized" }),
            Self::SourceNotFound => json!({ "message": "Source not found" }),
            Self::UpdateRequested(id) => {
                json!({ "message": format!("Update requested for source {}", id) })
            }
            Self::DispatchFailed(id) => {
                json!({ "message": format!("Failed to request update for source {}", id) })
            }
            Self::RegistryUnavailable => json!({ "message": "Source registry unavailable" }),
        }
    }

    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::SourceNotFound => "not_found",
            Self::UpdateRequested(_) => "accepted",
            Self::DispatchFailed(_) => "dispatch_failed",
            Self::RegistryUnavailable => "registry_unavailable",
        }
    }
}
