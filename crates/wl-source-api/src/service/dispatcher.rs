//! Update command dispatch.
//!
//! One command, one publish attempt. A failed publish is reported to the
//! caller, never retried here.

use crate::domain::entities::SourceId;
use crate::domain::outcome::DispatchOutcome;
use crate::ports::outbound::UpdateQueue;
use shared_bus::UpdateCommand;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds update commands and publishes them to the configured queue.
#[derive(Clone)]
pub struct UpdateDispatcher {
    queue: Arc<dyn UpdateQueue>,
}

impl UpdateDispatcher {
    pub fn new(queue: Arc<dyn UpdateQueue>) -> Self {
        Self { queue }
    }

    /// Publish `{id: source_id, force}` once.
    pub async fn request_update(&self, source_id: &SourceId, force: bool) -> DispatchOutcome {
        let command = UpdateCommand::new(source_id.as_str(), force);

        match self.queue.publish(&command).await {
            Ok(ack) if ack.accepted => {
                info!(
                    source_id = %source_id,
                    force,
                    queue = self.queue.target(),
                    message_id = ack.message_id.as_deref().unwrap_or("-"),
                    "Update command accepted by queue"
                );
                DispatchOutcome::Accepted {
                    message_id: ack.message_id,
                }
            }
            Ok(_) => {
                warn!(
                    source_id = %source_id,
                    queue = self.queue.target(),
                    "Queue did not acknowledge update command"
                );
                DispatchOutcome::Failed
            }
            Err(e) => {
                warn!(
                    source_id = %source_id,
                    queue = self.queue.target(),
                    error = %e,
                    "Failed to publish update command"
                );
                DispatchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingQueue;

    fn id(raw: &str) -> SourceId {
        SourceId::parse(Some(raw)).unwrap()
    }

    #[tokio::test]
    async fn test_accepted() {
        let queue = Arc::new(RecordingQueue::accepting());
        let dispatcher = UpdateDispatcher::new(queue.clone());

        let outcome = dispatcher.request_update(&id("wl-42"), false).await;

        assert_eq!(
            outcome,
            DispatchOutcome::Accepted {
                message_id: Some("msg-1".into())
            }
        );
        assert_eq!(queue.published(), vec![UpdateCommand::incremental("wl-42")]);
    }

    #[tokio::test]
    async fn test_force_flag_passed_through() {
        let queue = Arc::new(RecordingQueue::accepting());
        let dispatcher = UpdateDispatcher::new(queue.clone());

        dispatcher.request_update(&id("wl-42"), true).await;

        assert_eq!(queue.published(), vec![UpdateCommand::new("wl-42", true)]);
    }

    #[tokio::test]
    async fn test_rejected_ack_is_single_attempt() {
        let queue = Arc::new(RecordingQueue::rejecting());
        let dispatcher = UpdateDispatcher::new(queue.clone());

        assert_eq!(
            dispatcher.request_update(&id("wl-42"), false).await,
            DispatchOutcome::Failed
        );
        assert_eq!(queue.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_is_single_attempt() {
        let queue = Arc::new(RecordingQueue::failing());
        let dispatcher = UpdateDispatcher::new(queue.clone());

        assert_eq!(
            dispatcher.request_update(&id("wl-42"), false).await,
            DispatchOutcome::Failed
        );
        assert_eq!(queue.calls(), 1);
    }
}
