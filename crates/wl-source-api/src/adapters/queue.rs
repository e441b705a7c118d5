//! Update queue adapters.

use crate::domain::config::QueueConfig;
use crate::domain::error::{QueueError, ServiceError};
use crate::ports::outbound::{PublishAck, UpdateQueue};
use async_trait::async_trait;
use serde::Deserialize;
use shared_bus::{CommandEnvelope, CommandPublisher, InMemoryCommandBus, UpdateCommand};
use std::sync::Arc;
use tracing::debug;

/// Publishes to the in-process command bus.
///
/// A publish counts as acknowledged when at least one worker subscription
/// received the command.
pub struct BusUpdateQueue {
    bus: Arc<InMemoryCommandBus>,
    queue_name: String,
}

impl BusUpdateQueue {
    pub fn new(bus: Arc<InMemoryCommandBus>, queue_name: impl Into<String>) -> Self {
        Self {
            bus,
            queue_name: queue_name.into(),
        }
    }
}

#[async_trait]
impl UpdateQueue for BusUpdateQueue {
    async fn publish(&self, command: &UpdateCommand) -> Result<PublishAck, QueueError> {
        let envelope = CommandEnvelope::new(self.queue_name.clone(), command.clone());
        let message_id = envelope.message_id;

        let receivers = self.bus.publish(envelope).await;
        if receivers > 0 {
            Ok(PublishAck::accepted(Some(message_id.to_string())))
        } else {
            Ok(PublishAck::rejected())
        }
    }

    fn target(&self) -> &str {
        &self.queue_name
    }
}

/// Posts commands as JSON to a queue endpoint over HTTP.
///
/// Any 2xx answer is an acknowledgment. A `MessageId` or `message_id` field
/// in the response body is reported back when present.
pub struct HttpUpdateQueue {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct SendMessageResponse {
    #[serde(alias = "MessageId", alias = "messageId")]
    message_id: Option<String>,
}

impl HttpUpdateQueue {
    pub fn new(url: impl Into<String>, config: &QueueConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Client {
                client: "queue",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl UpdateQueue for HttpUpdateQueue {
    async fn publish(&self, command: &UpdateCommand) -> Result<PublishAck, QueueError> {
        let body = command.to_json()?;

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Queue endpoint refused command");
            return Ok(PublishAck::rejected());
        }

        // The acknowledgment is the status; an unreadable body only loses the id.
        let parsed = response
            .json::<SendMessageResponse>()
            .await
            .unwrap_or_default();
        Ok(PublishAck::accepted(parsed.message_id))
    }

    fn target(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bus_queue_without_workers_is_not_acknowledged() {
        let queue = BusUpdateQueue::new(Arc::new(InMemoryCommandBus::new()), "updates");

        let ack = queue
            .publish(&UpdateCommand::incremental("wl-42"))
            .await
            .unwrap();

        assert!(!ack.accepted);
        assert!(ack.message_id.is_none());
    }

    #[tokio::test]
    async fn test_bus_queue_delivers_to_worker() {
        let bus = Arc::new(InMemoryCommandBus::new());
        let mut worker = bus.subscribe();
        let queue = BusUpdateQueue::new(Arc::clone(&bus), "updates");

        let ack = queue
            .publish(&UpdateCommand::incremental("wl-42"))
            .await
            .unwrap();

        assert!(ack.accepted);
        let envelope = worker.recv().await.unwrap();
        assert_eq!(envelope.queue, "updates");
        assert_eq!(envelope.command, UpdateCommand::incremental("wl-42"));
        assert_eq!(ack.message_id, Some(envelope.message_id.to_string()));
    }

    #[test]
    fn test_send_message_response_aliases() {
        let parsed: SendMessageResponse =
            serde_json::from_str(r#"{"MessageId":"abc"}"#).unwrap();
        assert_eq!(parsed.message_id.as_deref(), Some("abc"));

        let parsed: SendMessageResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.message_id.is_none());
    }
}
