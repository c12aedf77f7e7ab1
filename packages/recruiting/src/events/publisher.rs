//! Reliable publish of domain events.

use crate::error::PublishError;
use crate::retry::RetryPolicy;
use crate::traits::bus::EventBus;

use super::DomainEvent;

/// Publishes domain events under the retry policy.
///
/// After exhausting retries the final error is returned: publish
/// failures are rare and actionable, so unlike extraction failures they
/// are allowed to surface to the publish caller.
pub struct EventPublisher<B> {
    bus: B,
    retry: RetryPolicy,
}

impl<B: EventBus> EventPublisher<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            retry: RetryPolicy::publish(),
        }
    }

    /// Override the retry policy (tests use [`RetryPolicy::immediate`]).
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Serialize and publish an event; returns the bus message id.
    pub async fn emit(&self, event: &DomainEvent) -> Result<String, PublishError> {
        let name = event.name();
        let bytes = serde_json::to_vec(event)?;

        let message_id = self
            .retry
            .run("event_publish", || self.bus.publish(name, &bytes))
            .await?;

        tracing::info!(event = name, message_id = %message_id, "event published");
        Ok(message_id)
    }
}
