//! # Service Layer
//!
//! The update workflow: authenticate, look up, dispatch. Each stage wraps one
//! outbound port and reports a tagged outcome; [`RequestHandler`] folds them
//! into the terminal [`UpdateOutcome`](crate::domain::UpdateOutcome).

pub mod auth_gate;
pub mod dispatcher;
pub mod handler;
pub mod lookup;

pub use auth_gate::{parse_bearer, AuthGate, BEARER_PREFIX};
pub use dispatcher::UpdateDispatcher;
pub use handler::RequestHandler;
pub use lookup::SourceLookup;
