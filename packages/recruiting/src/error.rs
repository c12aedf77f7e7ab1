//! Typed errors for the recruiting pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur while processing a turn through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input rejected before any model call (empty, non-text, oversized)
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Inference endpoint unavailable, timed out, or returned garbage
    #[error("inference error: {0}")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Extracted object failed a schema constraint
    #[error("schema violation: {0}")]
    Validation(#[from] SchemaViolation),

    /// Session store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Event publish failed after exhausting retries
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Shorthand for an input-validation rejection.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Shorthand for wrapping an inference endpoint failure.
    pub fn inference(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Inference(err.into())
    }
}

/// A single schema-constraint failure.
///
/// Validation is all-or-nothing per document: the first violation
/// rejects the whole extraction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("field `{field}`: {reason}")]
pub struct SchemaViolation {
    /// Dotted path of the offending field (e.g. `personal_details.email`)
    pub field: String,

    /// Why the constraint failed
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from session and document stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller-supplied session id collides with an existing session
    #[error("session already exists: {session_id}")]
    AlreadyExists { session_id: String },

    /// Backend unreachable or failing; callers degrade gracefully
    #[error("store unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Stored document could not be decoded
    #[error("corrupt document {collection}/{id}: {reason}")]
    Corrupt {
        collection: String,
        id: String,
        reason: String,
    },
}

impl StoreError {
    pub fn unavailable(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Unavailable(err.into())
    }
}

/// Errors from the event publish path.
///
/// Unlike extraction failures these propagate to the caller of the
/// publish operation: bus-unavailable is rare and actionable, and there
/// is no safe default.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Transport failure talking to the bus
    #[error("bus transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Bus did not acknowledge within the bounded wait
    #[error("publish not acknowledged within {timeout_ms}ms")]
    AckTimeout { timeout_ms: u64 },

    /// Payload could not be serialized
    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PublishError {
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_violation_display_names_field() {
        let v = SchemaViolation::new("personal_details.email", "invalid email format");
        assert_eq!(
            v.to_string(),
            "field `personal_details.email`: invalid email format"
        );
    }

    #[test]
    fn invalid_input_message() {
        let e = PipelineError::invalid_input("input text too large (max 50000 characters)");
        assert!(e.to_string().contains("50000"));
    }
}
