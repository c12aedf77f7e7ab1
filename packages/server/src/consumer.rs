//! Downstream event consumer.
//!
//! Pulls domain events from the bus, recovers a structured payload from
//! the message bytes, validates it into a typed event, and persists it
//! into a per-event collection in the document store. Malformed
//! messages are logged and dropped; the loop never dies on bad input.

use std::time::Duration;

use recruiting::{recover_structured_payload, DocumentStore, DomainEvent, EventBus, ReceivedEvent};

const CANDIDATES: &str = "candidates";
const JOB_POSTINGS: &str = "job_postings";
const COMPATIBILITY_SCORES: &str = "compatibility_scores";

/// Where one processed event landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    pub collection: &'static str,
    pub document_id: String,
}

/// Process a single pulled message. Returns `None` when the message is
/// unrecoverable or unknown (both handled gracefully).
pub async fn process_message<D: DocumentStore + ?Sized>(
    store: &D,
    message: &ReceivedEvent,
) -> Option<StoredEvent> {
    let raw = String::from_utf8_lossy(&message.data);

    let Some(value) = recover_structured_payload(&raw) else {
        tracing::warn!(
            message_id = %message.message_id,
            "message payload could not be recovered, dropping"
        );
        return None;
    };

    let event: DomainEvent = match serde_json::from_value(value) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(
                message_id = %message.message_id,
                error = %err,
                "recovered payload is not a known event, dropping"
            );
            return None;
        }
    };

    let (collection, payload) = match &event {
        DomainEvent::ParseResume(payload) => (CANDIDATES, serde_json::to_value(payload)),
        DomainEvent::ParseJobPosting(payload) => (JOB_POSTINGS, serde_json::to_value(payload)),
        DomainEvent::CompatibilityScore(payload) => {
            (COMPATIBILITY_SCORES, serde_json::to_value(payload))
        }
    };

    let payload = match payload {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(error = %err, "event payload re-serialization failed");
            return None;
        }
    };

    match store.insert(collection, &payload).await {
        Ok(document_id) => {
            tracing::info!(
                event = event.name(),
                collection,
                document_id = %document_id,
                "event persisted"
            );
            Some(StoredEvent {
                collection,
                document_id,
            })
        }
        Err(err) => {
            tracing::error!(
                event = event.name(),
                collection,
                error = %err,
                "failed to persist event"
            );
            None
        }
    }
}

/// Pull-and-persist loop. Runs until the task is cancelled.
pub async fn run<B, D>(bus: B, store: D, poll_interval: Duration)
where
    B: EventBus,
    D: DocumentStore,
{
    tracing::info!("event consumer started");
    loop {
        match bus.pull(10).await {
            Ok(messages) if messages.is_empty() => {
                tokio::time::sleep(poll_interval).await;
            }
            Ok(messages) => {
                for message in &messages {
                    process_message(&store, message).await;
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "pull failed, backing off");
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruiting::testing::{resume_fixture, MemoryEventBus};
    use recruiting::{EventPublisher, MemoryDocumentStore, Resume, RetryPolicy};

    #[tokio::test]
    async fn published_event_lands_in_the_right_collection() {
        let bus = std::sync::Arc::new(MemoryEventBus::new());
        let store = MemoryDocumentStore::new();
        let publisher =
            EventPublisher::new(bus.clone()).with_retry(RetryPolicy::immediate(3));

        let resume: Resume = serde_json::from_value(resume_fixture()).unwrap();
        let event = DomainEvent::parse_resume("u1", "s1", resume);
        publisher.emit(&event).await.unwrap();

        let messages = bus.pull(10).await.unwrap();
        assert_eq!(messages.len(), 1);

        let stored = process_message(&store, &messages[0]).await.unwrap();
        assert_eq!(stored.collection, "candidates");

        let doc = store
            .get("candidates", &stored.document_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["user_id"], "u1");
        assert_eq!(doc["resume_data"]["personal_details"]["full_name"], "Jane Doe");
    }

    #[tokio::test]
    async fn fenced_payload_is_recovered_before_persisting() {
        let store = MemoryDocumentStore::new();
        let inner = serde_json::json!({
            "name": "CompatibilityScoreEvent",
            "payload": {
                "user_id": "u1",
                "session_id": "s1",
                "compatibility_data": {
                    "compatibility_score": 70,
                    "summary": "good",
                    "matching_skills": null,
                    "missing_skills": null
                }
            }
        });
        let wrapped = format!("Here you go:\n```json\n{inner}\n```");

        let message = ReceivedEvent {
            message_id: "1".into(),
            event: Some("CompatibilityScoreEvent".into()),
            data: wrapped.into_bytes(),
        };

        let stored = process_message(&store, &message).await.unwrap();
        assert_eq!(stored.collection, "compatibility_scores");
    }

    #[tokio::test]
    async fn garbage_message_is_dropped_gracefully() {
        let store = MemoryDocumentStore::new();
        let message = ReceivedEvent {
            message_id: "1".into(),
            event: None,
            data: b"not even close to json".to_vec(),
        };

        assert!(process_message(&store, &message).await.is_none());
        assert_eq!(store.count("candidates"), 0);
    }

    #[tokio::test]
    async fn unknown_event_name_is_dropped_gracefully() {
        let store = MemoryDocumentStore::new();
        let message = ReceivedEvent {
            message_id: "1".into(),
            event: Some("MysteryEvent".into()),
            data: br#"{"name": "MysteryEvent", "payload": {}}"#.to_vec(),
        };

        assert!(process_message(&store, &message).await.is_none());
    }
}
