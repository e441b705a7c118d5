//! # Domain Entities
//!
//! Sources, principals and access tokens as seen by the update workflow.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally assigned identifier of a source.
///
/// Never blank. The value is kept exactly as the caller supplied it so the
/// published command carries the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Parse a raw path parameter. Absent or blank input yields `None`.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw {
            Some(value) if !value.trim().is_empty() => Some(Self(value.to_string())),
            _ => None,
        }
    }

    /// Borrow the id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A source record from the registry.
///
/// Only the id matters to this service; every other attribute is carried
/// along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: SourceId,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Source {
    /// Source with no descriptive attributes.
    pub fn new(id: SourceId) -> Self {
        Self {
            id,
            attributes: serde_json::Map::new(),
        }
    }
}

/// Resolved caller identity.
///
/// Opaque to the workflow: the value is never inspected or logged, only its
/// presence gates the request.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
}

impl Principal {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Principal([redacted])")
    }
}

/// Bearer access token stripped from the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}
