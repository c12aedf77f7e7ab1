//! Message bus seam.

use async_trait::async_trait;

use crate::error::PublishError;

/// A message pulled from the bus, already acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedEvent {
    /// Bus-assigned message id.
    pub message_id: String,

    /// Value of the `event` transport attribute, when present.
    pub event: Option<String>,

    /// Raw payload bytes (UTF-8 JSON on the happy path).
    pub data: Vec<u8>,
}

/// Publish-with-ack and pull-with-ack semantics over a topic configured
/// out-of-band.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish `payload` with `name` attached as the `event` transport
    /// attribute; awaits the broker acknowledgment and returns the
    /// assigned message id.
    async fn publish(&self, name: &str, payload: &[u8]) -> Result<String, PublishError>;

    /// Pull and acknowledge up to `max_messages` pending messages.
    async fn pull(&self, max_messages: usize) -> Result<Vec<ReceivedEvent>, PublishError>;
}

#[async_trait]
impl<T: EventBus + ?Sized> EventBus for std::sync::Arc<T> {
    async fn publish(&self, name: &str, payload: &[u8]) -> Result<String, PublishError> {
        (**self).publish(name, payload).await
    }

    async fn pull(&self, max_messages: usize) -> Result<Vec<ReceivedEvent>, PublishError> {
        (**self).pull(max_messages).await
    }
}
