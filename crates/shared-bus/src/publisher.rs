//! # Command Publisher
//!
//! Publishing side of the command bus.

use crate::commands::CommandEnvelope;
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing commands to the bus.
#[async_trait]
pub trait CommandPublisher: Send + Sync {
    /// Publish a command envelope.
    ///
    /// Returns the number of subscribers that received it. Zero means the
    /// command was dropped.
    async fn publish(&self, envelope: CommandEnvelope) -> usize;
}

/// In-process command bus over `tokio::sync::broadcast`.
///
/// Every subscriber sees every command published after it subscribed.
pub struct InMemoryCommandBus {
    sender: broadcast::Sender<CommandEnvelope>,
}

impl InMemoryCommandBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Attach a worker to the bus.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        debug!(subscribers = self.sender.receiver_count() + 1, "New subscription");
        Subscription::new(self.sender.subscribe())
    }
}

impl Default for InMemoryCommandBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandPublisher for InMemoryCommandBus {
    async fn publish(&self, envelope: CommandEnvelope) -> usize {
        let message_id = envelope.message_id;
        let queue = envelope.queue.clone();

        match self.sender.send(envelope) {
            Ok(receivers) => {
                debug!(%message_id, queue = %queue, receivers, "Command published");
                receivers
            }
            Err(_) => {
                warn!(%message_id, queue = %queue, "Command dropped, no subscribers");
                0
            }
        }
    }
}
