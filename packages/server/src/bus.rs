//! NATS JetStream implementation of the event bus.
//!
//! Publishes with broker acknowledgment and pulls with per-message ack,
//! so a published event survives until the downstream consumer has
//! processed it.

use std::time::Duration;

use async_nats::jetstream;
use async_trait::async_trait;
use futures::StreamExt;

use recruiting::{EventBus, PublishError, ReceivedEvent};

const ACK_WAIT: Duration = Duration::from_secs(10);

/// JetStream-backed [`EventBus`].
pub struct NatsEventBus {
    jetstream: jetstream::Context,
    subject: String,
    stream_name: String,
    consumer_name: String,
}

impl NatsEventBus {
    /// Connect and make sure the stream backing `subject` exists.
    pub async fn connect(url: &str, subject: impl Into<String>) -> anyhow::Result<Self> {
        let subject = subject.into();
        let stream_name = subject.replace('.', "_").to_uppercase();

        let client = async_nats::connect(url).await?;
        let jetstream = jetstream::new(client);

        jetstream
            .get_or_create_stream(jetstream::stream::Config {
                name: stream_name.clone(),
                subjects: vec![subject.clone()],
                ..Default::default()
            })
            .await?;

        tracing::info!(subject = %subject, stream = %stream_name, "connected to NATS");
        Ok(Self {
            jetstream,
            subject,
            stream_name,
            consumer_name: "talentflow-consumer".to_string(),
        })
    }

    /// Use a specific durable consumer name for pulls.
    pub fn with_consumer_name(mut self, name: impl Into<String>) -> Self {
        self.consumer_name = name.into();
        self
    }
}

#[async_trait]
impl EventBus for NatsEventBus {
    async fn publish(&self, name: &str, payload: &[u8]) -> Result<String, PublishError> {
        let mut headers = async_nats::HeaderMap::new();
        headers.insert("event", name);

        let ack_future = self
            .jetstream
            .publish_with_headers(
                self.subject.clone(),
                headers,
                bytes::Bytes::copy_from_slice(payload),
            )
            .await
            .map_err(PublishError::transport)?;

        let ack = tokio::time::timeout(ACK_WAIT, ack_future)
            .await
            .map_err(|_| PublishError::AckTimeout {
                timeout_ms: ACK_WAIT.as_millis() as u64,
            })?
            .map_err(PublishError::transport)?;

        Ok(ack.sequence.to_string())
    }

    async fn pull(&self, max_messages: usize) -> Result<Vec<ReceivedEvent>, PublishError> {
        let stream = self
            .jetstream
            .get_stream(&self.stream_name)
            .await
            .map_err(PublishError::transport)?;

        let consumer = stream
            .get_or_create_consumer(
                &self.consumer_name,
                jetstream::consumer::pull::Config {
                    durable_name: Some(self.consumer_name.clone()),
                    ..Default::default()
                },
            )
            .await
            .map_err(PublishError::transport)?;

        let mut batch = consumer
            .fetch()
            .max_messages(max_messages)
            .messages()
            .await
            .map_err(PublishError::transport)?;

        let mut received = Vec::new();
        while let Some(message) = batch.next().await {
            let message = message.map_err(PublishError::transport)?;

            let event = message
                .headers
                .as_ref()
                .and_then(|headers| headers.get("event"))
                .map(|value| value.to_string());
            let message_id = message
                .info()
                .map(|info| info.stream_sequence.to_string())
                .unwrap_or_default();
            let data = message.payload.to_vec();

            message.ack().await.map_err(PublishError::transport)?;

            received.push(ReceivedEvent {
                message_id,
                event,
                data,
            });
        }

        Ok(received)
    }
}
