//! Recruiting Document Intelligence Pipeline
//!
//! Routes free-text documents (résumés, job postings) and match
//! requests to schema-constrained extraction backed by an LLM inference
//! endpoint, tracks multi-turn conversation state per user, and
//! publishes results as domain events for downstream persistence.
//!
//! # Design
//!
//! - Schema-driven: every extractor returns a conforming
//!   [`ExtractionResult`] envelope, success or failure; callers never
//!   handle exceptions from the extraction path.
//! - Explicit seams: the inference endpoint, session store, document
//!   store, and message bus are traits injected at construction.
//! - Staged turns: the [`Dispatcher`] runs each turn through explicit
//!   pipeline stages with typed failure envelopes; event emission and
//!   session persistence are best-effort.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use recruiting::{
//!     ai::OpenAI, Dispatcher, EventPublisher, InMemorySessionService,
//!     TurnContent, TurnRequest,
//! };
//!
//! let ai = Arc::new(OpenAI::from_env()?);
//! let sessions = InMemorySessionService::new();
//! let publisher = EventPublisher::new(bus);
//! let dispatcher = Dispatcher::new(ai, sessions, publisher, "talentflow");
//!
//! let response = dispatcher
//!     .handle_turn(TurnRequest {
//!         user_id: "user-1".into(),
//!         session_id: None,
//!         content: TurnContent::Document { text: resume_text },
//!     })
//!     .await;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core seam abstractions (Inference, SessionService,
//!   DocumentStore, EventBus)
//! - [`schemas`] - Strict document contracts and validation
//! - [`extractors`] - Per-document-type extraction units
//! - [`session`] - Session model and store backends
//! - [`dispatch`] - Turn orchestration state machine
//! - [`events`] - Domain events, publishing, and recovery parsing
//! - [`stores`] - Document store implementations
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod extractors;
pub mod result;
pub mod retry;
pub mod sanitize;
pub mod schemas;
pub mod session;
pub mod stores;
pub mod testing;
pub mod traits;

// Re-export core types at crate root
pub use dispatch::{
    classify, Classification, Dispatcher, DocumentKind, FailureKind, SessionMeta, TurnContent,
    TurnOutcome, TurnRequest, TurnResponse, TurnStage,
};
pub use error::{PipelineError, PublishError, Result, SchemaViolation, StoreError};
pub use events::{
    recover_structured_payload, CompatibilityEventPayload, DomainEvent, EventPublisher,
    JobPostingEventPayload, ResumeEventPayload,
};
pub use extractors::{JobPostingExtractor, MatchScorer, ResumeExtractor};
pub use result::{ExtractionResult, OperationInfo, OperationStatus, OperationType, ProcessingTime};
pub use retry::RetryPolicy;
pub use sanitize::{sanitize, MAX_INPUT_LEN};
pub use schemas::{CompatibilityScore, JobPosting, Resume, SchemaKind, Validated};
pub use session::{
    DocumentSessionService, GetSessionConfig, InMemorySessionService, Session, SessionEvent,
};
pub use stores::MemoryDocumentStore;
pub use traits::{DocumentStore, EventBus, Inference, ReceivedEvent, SessionService};

#[cfg(feature = "sqlite")]
pub use stores::SqliteDocumentStore;
