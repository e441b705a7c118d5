//! # Shared Bus - Command Queue for Word-list Updates
//!
//! Carries update commands from the API to the workers that resynchronize
//! word lists from their sources.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Source API  │                    │ Update Worker│
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Command Bus │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! A publish is acknowledged when at least one subscriber received it. The
//! bus gives no processing or redelivery guarantees.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod commands;
pub mod publisher;
pub mod subscriber;

pub use commands::{CommandEnvelope, UpdateCommand};
pub use publisher::{CommandPublisher, InMemoryCommandBus};
pub use subscriber::Subscription;

/// Maximum commands to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Queue name used when none is configured.
pub const DEFAULT_QUEUE_NAME: &str = "update-from-source";
