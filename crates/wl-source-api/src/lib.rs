//! Word-list Source Update API
//!
//! Lets an authenticated caller request that a registered word source be
//! resynchronized. The API never performs the update itself; it verifies the
//! caller, confirms the source exists and queues an update command for the
//! workers.
//!
//! # Architecture
//!
//! ```text
//! POST /sources/:id/update
//!          │
//!   ┌──────┴──────────────────────────────────────────────┐
//!   │                  RequestHandler                      │
//!   │                                                      │
//!   │  AuthGate ──→ SourceLookup ──→ UpdateDispatcher      │
//!   │     │              │                 │               │
//!   └─────┼──────────────┼─────────────────┼───────────────┘
//!         ▼              ▼                 ▼
//!  IdentityProvider  SourceRegistry    UpdateQueue
//!   (userinfo/static) (in-memory)     (bus/HTTP)
//! ```
//!
//! Calls are strictly sequential and each happens at most once per request.
//! Every failure ends in one of the fixed JSON responses of
//! [`UpdateOutcome`](domain::UpdateOutcome).
//!
//! # Usage
//!
//! ```ignore
//! use wl_source_api::{ServiceConfig, SourceUpdateServer};
//!
//! let config = ServiceConfig::load()?;
//! SourceUpdateServer::from_config(config)?.run().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod router;
pub mod server;
pub mod service;
pub mod testing;

pub use domain::{ServiceConfig, ServiceError, SourceId, UpdateCommand, UpdateOutcome};
pub use metrics::HandlerMetrics;
pub use ports::{SourceUpdateApi, UpdateRequest};
pub use router::{build_router, AppState};
pub use server::{Clients, SourceUpdateServer};
pub use service::RequestHandler;
