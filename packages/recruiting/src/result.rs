//! The uniform envelope every extractor returns.
//!
//! Callers and event consumers are schema-driven: they always receive a
//! conforming object, success or not, and never have to special-case an
//! exception from the extraction path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which extraction routine produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    ResumeParsing,
    JobPostingAnalysis,
    CompatibilityScore,
}

impl OperationType {
    /// Stable label used in logs and session state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResumeParsing => "resume_parsing",
            Self::JobPostingAnalysis => "job_posting_analysis",
            Self::CompatibilityScore => "compatibility_score",
        }
    }
}

/// Outcome classification for one extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Success,
    Error,
    ValidationError,
}

impl OperationStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// How long the operation ran, or that it never completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ProcessingTime {
    Completed { elapsed_ms: u64 },
    Failed,
}

/// Operation metadata carried alongside every extraction result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationInfo {
    pub operation_type: OperationType,
    pub timestamp: DateTime<Utc>,
    pub processing_time: ProcessingTime,
    pub model_used: String,
    /// Populated if and only if the operation did not succeed.
    pub error: Option<String>,
}

/// Uniform wrapper around extractor output.
///
/// Invariants: `domain_data` is `Some` iff `operation_status` is
/// `Success`; `session_info.error` and `error_message` are populated iff
/// the status is non-success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult<T> {
    pub domain_data: Option<T>,
    pub session_info: OperationInfo,
    pub operation_status: OperationStatus,
    pub error_message: Option<String>,
}

impl<T> ExtractionResult<T> {
    /// Wrap a validated document.
    pub fn success(
        data: T,
        operation_type: OperationType,
        model_used: impl Into<String>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            domain_data: Some(data),
            session_info: OperationInfo {
                operation_type,
                timestamp: Utc::now(),
                processing_time: ProcessingTime::Completed { elapsed_ms },
                model_used: model_used.into(),
                error: None,
            },
            operation_status: OperationStatus::Success,
            error_message: None,
        }
    }

    /// Wrap a failure as a conforming envelope instead of raising.
    ///
    /// `error` names the failure kind for operators; `message` is the
    /// human-readable summary returned to callers. Neither echoes raw
    /// exception internals.
    pub fn failure(
        status: OperationStatus,
        operation_type: OperationType,
        model_used: impl Into<String>,
        error: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        debug_assert!(!status.is_success());
        Self {
            domain_data: None,
            session_info: OperationInfo {
                operation_type,
                timestamp: Utc::now(),
                processing_time: ProcessingTime::Failed,
                model_used: model_used.into(),
                error: Some(error.into()),
            },
            operation_status: status,
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.operation_status.is_success()
    }
}
