//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that the HTTP surface calls
//! - **Outbound (Driven)**: identity, registry and queue boundaries

pub mod inbound;
pub mod outbound;

pub use inbound::{SourceUpdateApi, UpdateRequest};
pub use outbound::{IdentityProvider, PublishAck, SourceRegistry, TokenResolution, UpdateQueue};
