//! Domain events and the pipeline that gets them onto the bus.
//!
//! One event per extraction outcome, consumed exactly once by a
//! downstream persistence consumer. The wire format is UTF-8 JSON
//! `{"name": <event name>, "payload": {...}}` published as message
//! bytes with `event=<name>` as a transport attribute.

mod publisher;
mod recover;

pub use publisher::EventPublisher;
pub use recover::recover_structured_payload;

use serde::{Deserialize, Serialize};

use crate::schemas::{CompatibilityScore, JobPosting, Resume};

/// Payload for a parsed résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeEventPayload {
    pub user_id: String,
    pub session_id: String,
    pub resume_data: Resume,
}

/// Payload for an analyzed job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPostingEventPayload {
    pub user_id: String,
    pub session_id: String,
    pub job_posting_data: JobPosting,
}

/// Payload for a generated compatibility score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityEventPayload {
    pub user_id: String,
    pub session_id: String,
    pub compatibility_data: CompatibilityScore,
}

/// A named, schema-shaped notification for asynchronous downstream
/// persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "payload")]
pub enum DomainEvent {
    #[serde(rename = "ParseResumeEvent")]
    ParseResume(ResumeEventPayload),

    #[serde(rename = "ParseJobPostingEvent")]
    ParseJobPosting(JobPostingEventPayload),

    #[serde(rename = "CompatibilityScoreEvent")]
    CompatibilityScore(CompatibilityEventPayload),
}

impl DomainEvent {
    pub fn parse_resume(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        resume_data: Resume,
    ) -> Self {
        Self::ParseResume(ResumeEventPayload {
            user_id: user_id.into(),
            session_id: session_id.into(),
            resume_data,
        })
    }

    pub fn parse_job_posting(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        job_posting_data: JobPosting,
    ) -> Self {
        Self::ParseJobPosting(JobPostingEventPayload {
            user_id: user_id.into(),
            session_id: session_id.into(),
            job_posting_data,
        })
    }

    pub fn compatibility_score(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        compatibility_data: CompatibilityScore,
    ) -> Self {
        Self::CompatibilityScore(CompatibilityEventPayload {
            user_id: user_id.into(),
            session_id: session_id.into(),
            compatibility_data,
        })
    }

    /// The routing name written to the `event` transport attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ParseResume(_) => "ParseResumeEvent",
            Self::ParseJobPosting(_) => "ParseJobPostingEvent",
            Self::CompatibilityScore(_) => "CompatibilityScoreEvent",
        }
    }
}
