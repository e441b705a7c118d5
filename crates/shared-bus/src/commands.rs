//! # Queue Commands
//!
//! Defines the command messages that flow through the shared bus to the
//! word-list update workers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Instruction to resynchronize the words derived from one source.
///
/// The wire form is `{"id": "<source id>", "force": <bool>}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpdateCommand {
    /// Id of the source to update from.
    pub id: String,
    /// `true` if words should be overwritten even when already extracted.
    pub force: bool,
}

impl UpdateCommand {
    /// Build a command for the given source.
    #[must_use]
    pub fn new(id: impl Into<String>, force: bool) -> Self {
        Self {
            id: id.into(),
            force,
        }
    }

    /// Incremental update: already-extracted words are kept.
    #[must_use]
    pub fn incremental(id: impl Into<String>) -> Self {
        Self::new(id, false)
    }

    /// Serialize to the JSON body published to the queue.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A command as carried on the bus, stamped with a message id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    /// Unique id assigned at publish time.
    pub message_id: Uuid,
    /// Name of the queue the command was published to.
    pub queue: String,
    /// The command itself.
    pub command: UpdateCommand,
}

impl CommandEnvelope {
    /// Wrap a command for the named queue with a fresh message id.
    #[must_use]
    pub fn new(queue: impl Into<String>, command: UpdateCommand) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            queue: queue.into(),
            command,
        }
    }
}
