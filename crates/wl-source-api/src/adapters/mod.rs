//! # Adapters Layer
//!
//! Implementations of the outbound ports:
//! - identity: userinfo endpoint over HTTP, or a static token set
//! - registry: in-process table, optionally seeded from JSON
//! - queue: in-process command bus, or a JSON endpoint over HTTP

pub mod identity;
pub mod queue;
pub mod registry;

pub use identity::{HttpIdentityProvider, StaticIdentityProvider};
pub use queue::{BusUpdateQueue, HttpUpdateQueue};
pub use registry::InMemorySourceRegistry;
