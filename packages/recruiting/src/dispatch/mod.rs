//! The orchestrator dispatcher.
//!
//! Each inbound turn runs through explicit stages: load (or create) the
//! session, classify the content, invoke the matching extractor, merge
//! the result with session metadata, emit the domain event, persist the
//! updated session. Stage failures resolve to a typed, non-throwing
//! envelope; emit and persist failures are logged without failing the
//! turn, trading a possible miss against turn availability.
//!
//! Session state is read-modify-write without a cross-turn lock: two
//! concurrent turns on one session can race, and the later persist wins.
//! Accepted for a low-contention conversational workload.

mod classify;
mod envelope;

pub use classify::{classify, Classification, DocumentKind};
pub use envelope::{
    FailureKind, SessionMeta, TurnContent, TurnOutcome, TurnRequest, TurnResponse, TurnStage,
};

use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::events::{DomainEvent, EventPublisher};
use crate::extractors::{JobPostingExtractor, MatchScorer, ResumeExtractor};
use crate::result::OperationStatus;
use crate::session::{state_keys, Session};
use crate::traits::ai::Inference;
use crate::traits::bus::EventBus;
use crate::traits::store::SessionService;

/// Routes turns to extractors and owns the session lifecycle for each.
pub struct Dispatcher<A: ?Sized, S, B> {
    resume: ResumeExtractor<Arc<A>>,
    job_posting: JobPostingExtractor<Arc<A>>,
    matcher: MatchScorer<Arc<A>>,
    sessions: S,
    publisher: EventPublisher<B>,
    app_name: String,
}

impl<A, S, B> Dispatcher<A, S, B>
where
    A: Inference + ?Sized,
    S: SessionService,
    B: EventBus,
{
    pub fn new(
        ai: Arc<A>,
        sessions: S,
        publisher: EventPublisher<B>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            resume: ResumeExtractor::new(ai.clone()),
            job_posting: JobPostingExtractor::new(ai.clone()),
            matcher: MatchScorer::new(ai),
            sessions,
            publisher,
            app_name: app_name.into(),
        }
    }

    /// Process one turn end to end. Never returns an error: every
    /// failure resolves to a typed envelope.
    pub async fn handle_turn(&self, request: TurnRequest) -> TurnResponse {
        let turn_started = Utc::now();

        // LOADING_SESSION: the one place interaction numbering is owned.
        let mut session = match self.load_session(&request).await {
            Ok(session) => session,
            Err(err) => {
                tracing::error!(
                    user_id = %request.user_id,
                    error = %err,
                    "session could not be loaded or created"
                );
                return TurnResponse {
                    session: SessionMeta {
                        session_id: request.session_id.clone().unwrap_or_default(),
                        user_id: request.user_id.clone(),
                        interaction_number: 0,
                        conversation_started: None,
                        turn_started_at: turn_started,
                        turn_completed_at: Utc::now(),
                    },
                    outcome: TurnOutcome::Failed {
                        stage: TurnStage::LoadingSession,
                        error: FailureKind::SessionUnavailable,
                        message: "session backend unavailable".into(),
                    },
                };
            }
        };

        let interaction_number = session.increment_interaction_count();
        session.set_state(
            state_keys::LAST_INTERACTION_START,
            Value::from(turn_started.to_rfc3339()),
        );
        tracing::info!(
            session_id = %session.id,
            user_id = %session.user_id,
            interaction_number,
            "turn started"
        );

        // CLASSIFYING + EXTRACTING
        let outcome = self.run_extraction(&request, &mut session).await;

        session.set_state(
            state_keys::LAST_OPERATION_STATUS,
            Value::from(status_label(&outcome)),
        );
        if let Some(operation) = operation_label(&outcome) {
            session.set_state(state_keys::LAST_OPERATION_TYPE, Value::from(operation));
        }
        session.set_state(
            state_keys::LAST_INTERACTION_END,
            Value::from(Utc::now().to_rfc3339()),
        );

        // MERGING: compose, never mutate the inner result.
        let response = TurnResponse {
            session: SessionMeta {
                session_id: session.id.clone(),
                user_id: session.user_id.clone(),
                interaction_number,
                conversation_started: session
                    .state_str(state_keys::CONVERSATION_STARTED)
                    .map(str::to_string),
                turn_started_at: turn_started,
                turn_completed_at: Utc::now(),
            },
            outcome,
        };

        // EMITTING: best-effort; the response is already computed.
        if let Some(event) = event_for(&response) {
            if let Err(err) = self.publisher.emit(&event).await {
                tracing::error!(
                    session_id = %session.id,
                    event = event.name(),
                    error = %err,
                    "event emission failed, continuing"
                );
            }
        }

        // PERSISTING: best-effort full-state write-back.
        if let Err(err) = self.sessions.update_session(&session).await {
            tracing::error!(
                session_id = %session.id,
                error = %err,
                "session persistence failed, returning response anyway"
            );
        }

        response
    }

    /// Fetch the session, degrade a read failure to "absent", and
    /// create a fresh session when needed.
    async fn load_session(&self, request: &TurnRequest) -> Result<Session, crate::error::StoreError> {
        let mut requested_id = request.session_id.clone();

        if let Some(id) = requested_id.as_deref() {
            match self
                .sessions
                .get_session(&self.app_name, &request.user_id, id, None)
                .await
            {
                Ok(Some(session)) => return Ok(session),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        session_id = %id,
                        error = %err,
                        "session read failed, continuing with a fresh session"
                    );
                    // A fresh generated id avoids the collision check
                    // that would touch the failing read path again.
                    requested_id = None;
                }
            }
        }

        let mut state = IndexMap::new();
        state.insert(
            state_keys::CONVERSATION_STARTED.to_string(),
            Value::from(Utc::now().to_rfc3339()),
        );
        state.insert(state_keys::INTERACTION_COUNT.to_string(), Value::from(0u64));

        self.sessions
            .create_session(&self.app_name, &request.user_id, Some(state), requested_id)
            .await
    }

    /// CLASSIFYING + EXTRACTING, returning the turn outcome.
    async fn run_extraction(&self, request: &TurnRequest, session: &mut Session) -> TurnOutcome {
        match &request.content {
            TurnContent::Document { text } => {
                let classification = classify(text);
                tracing::info!(
                    session_id = %session.id,
                    kind = ?classification.kind,
                    resume_score = classification.resume_score,
                    job_posting_score = classification.job_posting_score,
                    "content classified"
                );

                match classification.kind {
                    DocumentKind::Resume => match self.resume.extract(text).await {
                        Ok(result) => {
                            let document_id =
                                store_extracted(session, "resume", result.domain_data.as_ref());
                            session.log_event(
                                Some(result.session_info.operation_type),
                                "resume parsing turn",
                            );
                            TurnOutcome::Resume {
                                document_id,
                                result,
                            }
                        }
                        Err(err) => invalid_input_outcome(err),
                    },
                    DocumentKind::JobPosting => match self.job_posting.extract(text).await {
                        Ok(result) => {
                            let document_id = store_extracted(
                                session,
                                "job_posting",
                                result.domain_data.as_ref(),
                            );
                            session.log_event(
                                Some(result.session_info.operation_type),
                                "job posting analysis turn",
                            );
                            TurnOutcome::JobPosting {
                                document_id,
                                result,
                            }
                        }
                        Err(err) => invalid_input_outcome(err),
                    },
                }
            }
            TurnContent::Match {
                resume_id,
                job_posting_id,
            } => {
                let resume_data = match lookup_document(session, resume_id, "resume") {
                    Ok(data) => data,
                    Err(outcome) => return outcome,
                };
                let job_posting_data = match lookup_document(session, job_posting_id, "job_posting")
                {
                    Ok(data) => data,
                    Err(outcome) => return outcome,
                };

                let result = self.matcher.score(&resume_data, &job_posting_data).await;
                session.log_event(
                    Some(result.session_info.operation_type),
                    "compatibility scoring turn",
                );
                TurnOutcome::Match { result }
            }
        }
    }
}

/// Record a successful extraction in session state and hand back its id.
fn store_extracted<T: serde::Serialize>(
    session: &mut Session,
    kind: &str,
    data: Option<&T>,
) -> Option<String> {
    let data = data?;
    let payload = serde_json::to_value(data).ok()?;
    let document_id = Uuid::new_v4().to_string();
    session.store_document(&document_id, json!({"kind": kind, "data": payload}));
    Some(document_id)
}

/// Resolve a match-request document id from session state.
fn lookup_document(
    session: &Session,
    document_id: &str,
    expected_kind: &str,
) -> Result<Value, TurnOutcome> {
    let entry = session
        .documents()
        .and_then(|docs| docs.get(document_id))
        .cloned();

    match entry {
        Some(doc) if doc["kind"] == expected_kind => Ok(doc["data"].clone()),
        Some(_) => Err(TurnOutcome::Failed {
            stage: TurnStage::Extracting,
            error: FailureKind::UnknownDocument,
            message: format!("document {document_id} is not a {expected_kind}"),
        }),
        None => Err(TurnOutcome::Failed {
            stage: TurnStage::Extracting,
            error: FailureKind::UnknownDocument,
            message: format!("no stored document with id {document_id}"),
        }),
    }
}

/// Sanitizer rejection is the one extractor error that surfaces; it
/// becomes a typed envelope rather than a propagated fault.
fn invalid_input_outcome(err: PipelineError) -> TurnOutcome {
    let message = match &err {
        PipelineError::InvalidInput { reason } => reason.clone(),
        other => other.to_string(),
    };
    TurnOutcome::Failed {
        stage: TurnStage::Extracting,
        error: FailureKind::InvalidInput,
        message,
    }
}

/// Label written to `last_operation_type` in session state.
fn operation_label(outcome: &TurnOutcome) -> Option<&'static str> {
    let operation = match outcome {
        TurnOutcome::Resume { result, .. } => result.session_info.operation_type,
        TurnOutcome::JobPosting { result, .. } => result.session_info.operation_type,
        TurnOutcome::Match { result } => result.session_info.operation_type,
        TurnOutcome::Failed { .. } => return None,
    };
    Some(operation.as_str())
}

/// Label written to `last_operation_status` in session state.
fn status_label(outcome: &TurnOutcome) -> &'static str {
    let status = match outcome {
        TurnOutcome::Resume { result, .. } => result.operation_status,
        TurnOutcome::JobPosting { result, .. } => result.operation_status,
        TurnOutcome::Match { result } => result.operation_status,
        TurnOutcome::Failed { .. } => return "failed",
    };
    match status {
        OperationStatus::Success => "success",
        OperationStatus::Error => "error",
        OperationStatus::ValidationError => "validation_error",
    }
}

/// Build the domain event mirroring a successful outcome, if any.
fn event_for(response: &TurnResponse) -> Option<DomainEvent> {
    let user_id = &response.session.user_id;
    let session_id = &response.session.session_id;
    match &response.outcome {
        TurnOutcome::Resume { result, .. } => result
            .domain_data
            .clone()
            .map(|data| DomainEvent::parse_resume(user_id, session_id, data)),
        TurnOutcome::JobPosting { result, .. } => result
            .domain_data
            .clone()
            .map(|data| DomainEvent::parse_job_posting(user_id, session_id, data)),
        TurnOutcome::Match { result } => result
            .domain_data
            .clone()
            .map(|data| DomainEvent::compatibility_score(user_id, session_id, data)),
        TurnOutcome::Failed { .. } => None,
    }
}
