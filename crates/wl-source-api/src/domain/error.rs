//! Error types for the boundary clients and the service process.
//!
//! None of these ever reach a response body; the request handler maps every
//! failure onto one of the fixed response shapes.

use thiserror::Error;

/// Identity provider boundary errors.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Provider could not be reached
    #[error("identity provider unreachable: {0}")]
    Transport(String),

    /// Provider answered with a status that is neither success nor rejection
    #[error("identity provider returned status {0}")]
    UnexpectedStatus(u16),

    /// Provider answered with a body that could not be decoded
    #[error("invalid identity provider response: {0}")]
    InvalidResponse(String),
}

/// Source registry boundary errors.
///
/// A missing source is not an error; see `LookupOutcome::NotFound`.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registry could not be reached or failed the read
    #[error("source registry unavailable: {0}")]
    Unavailable(String),

    /// Seed data could not be loaded at startup
    #[error("failed to load registry seed {path}: {reason}")]
    Seed { path: String, reason: String },
}

/// Queue boundary errors.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Command could not be encoded
    #[error("failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),

    /// Queue could not be reached
    #[error("queue unreachable: {0}")]
    Transport(String),
}

/// Process-level errors (startup and serving).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] crate::domain::config::ConfigError),

    /// Boundary client could not be built
    #[error("failed to build {client} client: {reason}")]
    Client { client: &'static str, reason: String },

    /// Registry seed failed to load
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server failed while serving
    #[error("server error: {0}")]
    Serve(String),
}

impl From<reqwest::Error> for IdentityError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            IdentityError::InvalidResponse(e.to_string())
        } else {
            IdentityError::Transport(e.to_string())
        }
    }
}

impl From<reqwest::Error> for QueueError {
    fn from(e: reqwest::Error) -> Self {
        QueueError::Transport(e.to_string())
    }
}
