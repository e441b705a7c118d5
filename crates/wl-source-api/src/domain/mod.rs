//! Domain types for the source update service.
//!
//! Entities, workflow outcomes, configuration and error types. No I/O.

pub mod config;
pub mod entities;
pub mod error;
pub mod outcome;

pub use config::{ConfigError, ServiceConfig};
pub use entities::{AccessToken, Principal, Source, SourceId};
pub use error::{IdentityError, QueueError, RegistryError, ServiceError};
pub use outcome::{AuthDecision, DispatchOutcome, LookupOutcome, RejectReason, UpdateOutcome};
pub use shared_bus::UpdateCommand;
