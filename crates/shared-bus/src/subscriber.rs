//! # Command Subscriber
//!
//! Consuming side of the command bus. Update workers hold a [`Subscription`]
//! and await commands with [`Subscription::recv`].

use crate::commands::CommandEnvelope;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

/// A worker's handle on the bus. Dropping it detaches the worker.
pub struct Subscription {
    receiver: broadcast::Receiver<CommandEnvelope>,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<CommandEnvelope>) -> Self {
        Self { receiver }
    }

    /// Wait for the next command.
    ///
    /// Returns `None` once the bus has been dropped. A slow worker skips the
    /// commands it lagged behind on.
    pub async fn recv(&mut self) -> Option<CommandEnvelope> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) => return Some(envelope),
                Err(RecvError::Closed) => return None,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Subscriber lagged, commands dropped");
                }
            }
        }
    }
}
