//! Integration tests for the full extraction/event pipeline.
//!
//! These exercise the public API end to end: turn dispatch over a
//! durable session backend, event publication, and the downstream
//! consumer's recovery parsing of published bytes.

use std::sync::Arc;

use recruiting::testing::{
    compatibility_fixture, job_posting_fixture, resume_fixture, MemoryEventBus, MockInference,
};
use recruiting::{
    recover_structured_payload, Dispatcher, DocumentSessionService, DomainEvent, EventBus,
    EventPublisher, FailureKind, MemoryDocumentStore, RetryPolicy, SchemaKind, SessionService,
    TurnContent, TurnOutcome, TurnRequest,
};

const APP: &str = "talentflow";

fn mock_ai() -> Arc<MockInference> {
    Arc::new(
        MockInference::new()
            .with_response(SchemaKind::Resume, resume_fixture())
            .with_response(SchemaKind::JobPosting, job_posting_fixture())
            .with_response(SchemaKind::CompatibilityScore, compatibility_fixture()),
    )
}

fn dispatcher_over(
    store: Arc<MemoryDocumentStore>,
    bus: Arc<MemoryEventBus>,
) -> Dispatcher<MockInference, DocumentSessionService<Arc<MemoryDocumentStore>>, Arc<MemoryEventBus>>
{
    let sessions =
        DocumentSessionService::new(store).with_retry(RetryPolicy::immediate(3));
    Dispatcher::new(
        mock_ai(),
        sessions,
        EventPublisher::new(bus).with_retry(RetryPolicy::immediate(3)),
        APP,
    )
}

fn resume_turn(session_id: Option<String>) -> TurnRequest {
    TurnRequest {
        user_id: "user-1".into(),
        session_id,
        content: TurnContent::Document {
            text: "Education\nWork Experience\nSkills: Python, SQL".into(),
        },
    }
}

#[tokio::test]
async fn resume_turn_over_durable_store_publishes_consumable_event() {
    let store = Arc::new(MemoryDocumentStore::new());
    let bus = Arc::new(MemoryEventBus::new());
    let dispatcher = dispatcher_over(store, bus.clone());

    let response = dispatcher.handle_turn(resume_turn(None)).await;

    let TurnOutcome::Resume { result, .. } = &response.outcome else {
        panic!("expected resume outcome");
    };
    assert!(result.is_success());

    // The consumer's view: pull the message and recover the payload.
    let pulled = bus.pull(10).await.unwrap();
    assert_eq!(pulled.len(), 1);
    assert_eq!(pulled[0].event.as_deref(), Some("ParseResumeEvent"));

    let raw = String::from_utf8(pulled[0].data.clone()).unwrap();
    let recovered = recover_structured_payload(&raw).expect("payload recovers");
    assert_eq!(recovered["name"], "ParseResumeEvent");
    assert_eq!(recovered["payload"]["user_id"], "user-1");

    let event: DomainEvent = serde_json::from_value(recovered).unwrap();
    let DomainEvent::ParseResume(payload) = event else {
        panic!("expected ParseResumeEvent");
    };
    assert_eq!(payload.resume_data.personal_details.full_name, "Jane Doe");
}

#[tokio::test]
async fn session_survives_across_turns_in_the_durable_backend() {
    let store = Arc::new(MemoryDocumentStore::new());
    let bus = Arc::new(MemoryEventBus::new());
    let dispatcher = dispatcher_over(store.clone(), bus);

    let first = dispatcher.handle_turn(resume_turn(None)).await;
    let session_id = first.session.session_id.clone();
    assert_eq!(first.session.interaction_number, 1);

    let second = dispatcher
        .handle_turn(resume_turn(Some(session_id.clone())))
        .await;
    assert_eq!(second.session.interaction_number, 2);
    assert_eq!(
        second.session.conversation_started, first.session.conversation_started,
        "conversation start is written once"
    );

    // The session document is really in the store.
    let sessions = DocumentSessionService::new(store).with_retry(RetryPolicy::immediate(3));
    let session = sessions
        .get_session(APP, "user-1", &session_id, None)
        .await
        .unwrap()
        .expect("persisted session");
    assert_eq!(session.interaction_count(), 2);
}

#[tokio::test]
async fn store_outage_on_read_degrades_to_a_fresh_session() {
    let store = Arc::new(MemoryDocumentStore::new());
    let bus = Arc::new(MemoryEventBus::new());
    let dispatcher = dispatcher_over(store.clone(), bus);

    // Reads fail (including retries); writes still work.
    store.fail_next_reads(u32::MAX);

    let response = dispatcher
        .handle_turn(resume_turn(Some("previously-known".into())))
        .await;

    let TurnOutcome::Resume { result, .. } = &response.outcome else {
        panic!("turn proceeded with a fresh session, got {:?}", response.outcome);
    };
    assert!(result.is_success());
    assert_ne!(response.session.session_id, "previously-known");
    assert_eq!(response.session.interaction_number, 1);
}

#[tokio::test]
async fn persist_failure_after_extraction_still_returns_the_response() {
    let store = Arc::new(MemoryDocumentStore::new());
    let bus = Arc::new(MemoryEventBus::new());
    let dispatcher = dispatcher_over(store.clone(), bus);

    // Seed a session so LOADING succeeds on the read path.
    let first = dispatcher.handle_turn(resume_turn(None)).await;
    let session_id = first.session.session_id.clone();

    store.fail_next_writes(u32::MAX);
    let second = dispatcher
        .handle_turn(resume_turn(Some(session_id)))
        .await;

    let TurnOutcome::Resume { result, .. } = &second.outcome else {
        panic!();
    };
    assert!(result.is_success(), "response returned despite write outage");
    assert_eq!(second.session.interaction_number, 2);
}

#[tokio::test]
async fn full_match_scenario_produces_three_events() {
    let store = Arc::new(MemoryDocumentStore::new());
    let bus = Arc::new(MemoryEventBus::new());
    let dispatcher = dispatcher_over(store, bus.clone());

    let first = dispatcher.handle_turn(resume_turn(None)).await;
    let session_id = first.session.session_id.clone();
    let TurnOutcome::Resume { document_id, .. } = &first.outcome else {
        panic!();
    };
    let resume_id = document_id.clone().unwrap();

    let second = dispatcher
        .handle_turn(TurnRequest {
            user_id: "user-1".into(),
            session_id: Some(session_id.clone()),
            content: TurnContent::Document {
                text: "We are seeking a candidate. Responsibilities: deploy models. \
                       Qualifications: BSc. Salary and benefits. Apply now, hiring!"
                    .into(),
            },
        })
        .await;
    let TurnOutcome::JobPosting { document_id, .. } = &second.outcome else {
        panic!("expected job posting outcome, got {:?}", second.outcome);
    };
    let job_posting_id = document_id.clone().unwrap();

    let third = dispatcher
        .handle_turn(TurnRequest {
            user_id: "user-1".into(),
            session_id: Some(session_id),
            content: TurnContent::Match {
                resume_id,
                job_posting_id,
            },
        })
        .await;
    let TurnOutcome::Match { result } = &third.outcome else {
        panic!("expected match outcome, got {:?}", third.outcome);
    };
    assert!(result.is_success());

    let names: Vec<String> = bus.published().into_iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec![
            "ParseResumeEvent".to_string(),
            "ParseJobPostingEvent".to_string(),
            "CompatibilityScoreEvent".to_string(),
        ]
    );
}

#[tokio::test]
async fn match_against_wrong_document_kind_is_rejected() {
    let store = Arc::new(MemoryDocumentStore::new());
    let bus = Arc::new(MemoryEventBus::new());
    let dispatcher = dispatcher_over(store, bus);

    let first = dispatcher.handle_turn(resume_turn(None)).await;
    let session_id = first.session.session_id.clone();
    let TurnOutcome::Resume { document_id, .. } = &first.outcome else {
        panic!();
    };
    let resume_id = document_id.clone().unwrap();

    // Use the resume id in the job-posting slot.
    let response = dispatcher
        .handle_turn(TurnRequest {
            user_id: "user-1".into(),
            session_id: Some(session_id),
            content: TurnContent::Match {
                resume_id: resume_id.clone(),
                job_posting_id: resume_id,
            },
        })
        .await;

    assert_eq!(
        response.outcome.failure_kind(),
        Some(FailureKind::UnknownDocument)
    );
}
