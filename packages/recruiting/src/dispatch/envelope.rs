//! Turn request and response envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::ExtractionResult;
use crate::schemas::{CompatibilityScore, JobPosting, Resume};

/// What a turn carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TurnContent {
    /// Free-text document to classify and extract.
    Document { text: String },

    /// Explicit match request referencing two prior extractions by id.
    Match {
        resume_id: String,
        job_posting_id: String,
    },
}

/// One inbound turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub user_id: String,
    pub session_id: Option<String>,
    pub content: TurnContent,
}

/// Pipeline stage names, used in logs and failure envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStage {
    LoadingSession,
    Classifying,
    Extracting,
    Merging,
    Emitting,
    Persisting,
}

impl TurnStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadingSession => "loading_session",
            Self::Classifying => "classifying",
            Self::Extracting => "extracting",
            Self::Merging => "merging",
            Self::Emitting => "emitting",
            Self::Persisting => "persisting",
        }
    }
}

/// How a turn failed, for callers that map failures onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// User-caused input rejection (4xx semantics).
    InvalidInput,

    /// A referenced document id is absent or of the wrong type.
    UnknownDocument,

    /// Session backend was unavailable for a required operation.
    SessionUnavailable,
}

/// Session metadata merged into every response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMeta {
    pub session_id: String,
    pub user_id: String,
    pub interaction_number: u64,
    pub conversation_started: Option<String>,
    pub turn_started_at: DateTime<Utc>,
    pub turn_completed_at: DateTime<Utc>,
}

/// What a turn produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TurnOutcome {
    Resume {
        /// Id the stored extraction is addressable by in later match
        /// requests; absent when the extraction failed.
        document_id: Option<String>,
        result: ExtractionResult<Resume>,
    },
    JobPosting {
        document_id: Option<String>,
        result: ExtractionResult<JobPosting>,
    },
    Match {
        result: ExtractionResult<CompatibilityScore>,
    },
    Failed {
        stage: TurnStage,
        error: FailureKind,
        message: String,
    },
}

impl TurnOutcome {
    /// The failure kind, when this outcome is a typed failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Failed { error, .. } => Some(*error),
            _ => None,
        }
    }
}

/// The final response envelope: session metadata composed around the
/// extraction outcome. Composition never mutates the inner result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResponse {
    pub session: SessionMeta,
    pub outcome: TurnOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_content_wire_shape() {
        let json = serde_json::to_value(TurnContent::Match {
            resume_id: "r1".into(),
            job_posting_id: "j1".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "match");
        assert_eq!(json["resume_id"], "r1");

        let back: TurnContent =
            serde_json::from_value(serde_json::json!({"type": "document", "text": "hi"})).unwrap();
        assert_eq!(
            back,
            TurnContent::Document {
                text: "hi".to_string()
            }
        );
    }

    #[test]
    fn failed_outcome_serializes_stage_and_kind() {
        let outcome = TurnOutcome::Failed {
            stage: TurnStage::Extracting,
            error: FailureKind::InvalidInput,
            message: "input text too large".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["type"], "failed");
        assert_eq!(json["stage"], "extracting");
        assert_eq!(json["error"], "invalid_input");
        assert_eq!(outcome.failure_kind(), Some(FailureKind::InvalidInput));
    }
}
