//! # Outbound Ports (Driven Ports / SPI)
//!
//! The three boundary clients the update workflow depends on. Implementations
//! are built once per process and shared across requests, so they must be
//! `Send + Sync` and hold no per-request state.

use crate::domain::entities::{AccessToken, Principal, Source, SourceId};
use crate::domain::error::{IdentityError, QueueError, RegistryError};
use async_trait::async_trait;
use shared_bus::UpdateCommand;

/// Answer from the identity provider for a well-formed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenResolution {
    /// Token maps to a user
    Resolved(Principal),
    /// Provider answered but no identity could be resolved
    Unresolved,
}

/// Identity provider verification boundary.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the user behind an access token.
    ///
    /// # Errors
    /// * `IdentityError` - provider unreachable or answered unexpectedly
    async fn resolve_user(&self, token: &AccessToken) -> Result<TokenResolution, IdentityError>;
}

/// Read-only access to the source registry.
#[async_trait]
pub trait SourceRegistry: Send + Sync {
    /// Single-key read of a source record.
    ///
    /// `Ok(None)` means the source does not exist.
    ///
    /// # Errors
    /// * `RegistryError` - registry unreachable or record unreadable
    async fn get_by_id(&self, id: &SourceId) -> Result<Option<Source>, RegistryError>;

    /// Name of the table this client reads from.
    fn table_name(&self) -> &str;
}

/// Transport acknowledgment for one publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAck {
    /// Queue accepted the message
    pub accepted: bool,
    /// Id assigned by the queue, when it reports one
    pub message_id: Option<String>,
}

impl PublishAck {
    pub fn accepted(message_id: Option<String>) -> Self {
        Self {
            accepted: true,
            message_id,
        }
    }

    pub fn rejected() -> Self {
        Self {
            accepted: false,
            message_id: None,
        }
    }
}

/// Queue carrying update commands to the workers.
#[async_trait]
pub trait UpdateQueue: Send + Sync {
    /// Publish one command. Exactly one attempt, no retry.
    ///
    /// # Errors
    /// * `QueueError` - the command could not be encoded or sent
    async fn publish(&self, command: &UpdateCommand) -> Result<PublishAck, QueueError>;

    /// Configured queue target, for logging.
    fn target(&self) -> &str;
}
