//! Per-document-type extraction units.
//!
//! All three extractors share one contract: sanitize the input, invoke
//! the inference endpoint constrained to the registry schema, validate,
//! and wrap as an [`ExtractionResult`]. Failures past sanitization are
//! never propagated: the caller always receives a conforming envelope,
//! with `error` status for transport/model failures and
//! `validation_error` status for schema violations. Only sanitizer
//! rejection surfaces as an `Err` (`InvalidInput`, user-caused).

mod job_posting;
mod matcher;
mod resume;

pub use job_posting::JobPostingExtractor;
pub use matcher::MatchScorer;
pub use resume::ResumeExtractor;

use std::time::Instant;

use crate::error::PipelineError;
use crate::result::{ExtractionResult, OperationStatus, OperationType};
use crate::schemas::{SchemaKind, Validated};
use crate::traits::ai::Inference;

/// Invoke the model against a registry schema, validate the output, and
/// wrap the outcome. Never returns an error: every failure becomes a
/// conforming failure envelope.
pub(crate) async fn infer_validated<T, A>(
    ai: &A,
    operation: OperationType,
    instructions: &str,
    input: &str,
    kind: SchemaKind,
    failure_hint: &str,
) -> ExtractionResult<T>
where
    T: Validated,
    A: Inference + ?Sized,
{
    let started = Instant::now();
    let model = ai.model_name().to_string();

    let outcome = ai
        .generate_structured(instructions, input, kind.json_schema())
        .await
        .and_then(|value| {
            let parsed: T = serde_json::from_value(value)?;
            parsed.validate()?;
            Ok(parsed)
        });

    match outcome {
        Ok(data) => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            tracing::info!(
                operation = operation.as_str(),
                model = %model,
                elapsed_ms,
                "extraction succeeded"
            );
            ExtractionResult::success(data, operation, model, elapsed_ms)
        }
        Err(err) => {
            tracing::error!(
                operation = operation.as_str(),
                model = %model,
                error = %err,
                "extraction failed, returning fallback envelope"
            );
            let (status, error_label) = failure_label(&err);
            ExtractionResult::failure(
                status,
                operation,
                model,
                error_label,
                format!("{failure_hint}: {}. Please try again or contact support.", kind_name(&err)),
            )
        }
    }
}

/// Map a failure to its status and an operator-facing label that names
/// the failure without echoing raw internals.
fn failure_label(err: &PipelineError) -> (OperationStatus, String) {
    match err {
        PipelineError::Validation(violation) => (
            OperationStatus::ValidationError,
            format!("schema violation: {violation}"),
        ),
        PipelineError::Json(_) => (
            OperationStatus::ValidationError,
            "model output did not match the schema".to_string(),
        ),
        _ => (OperationStatus::Error, kind_name(err).to_string()),
    }
}

/// Short human-readable name for an error kind.
fn kind_name(err: &PipelineError) -> &'static str {
    match err {
        PipelineError::InvalidInput { .. } => "invalid input",
        PipelineError::Inference(_) => "inference failure",
        PipelineError::Validation(_) => "schema validation failure",
        PipelineError::Json(_) => "malformed model output",
        PipelineError::Store(_) => "store failure",
        PipelineError::Publish(_) => "publish failure",
        PipelineError::Config(_) => "configuration error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::Resume;
    use crate::testing::MockInference;

    #[tokio::test]
    async fn inference_failure_becomes_error_envelope() {
        let ai = MockInference::new().failing("model unavailable");
        let result: ExtractionResult<Resume> = infer_validated(
            &ai,
            OperationType::ResumeParsing,
            "instructions",
            "input",
            SchemaKind::Resume,
            "Resume parsing failed",
        )
        .await;

        assert_eq!(result.operation_status, OperationStatus::Error);
        assert!(result.domain_data.is_none());
        assert_eq!(result.session_info.error.as_deref(), Some("inference failure"));
        assert!(result.error_message.as_deref().unwrap().contains("Resume parsing failed"));
    }

    #[tokio::test]
    async fn constraint_violation_becomes_validation_error_envelope() {
        let bad = serde_json::json!({
            "personal_details": {
                "full_name": "Jane <script>x</script>",
                "email": null, "phone_number": null, "location": null, "links": null
            }
        });
        let ai = MockInference::new().with_response(SchemaKind::Resume, bad);
        let result: ExtractionResult<Resume> = infer_validated(
            &ai,
            OperationType::ResumeParsing,
            "instructions",
            "input",
            SchemaKind::Resume,
            "Resume parsing failed",
        )
        .await;

        assert_eq!(result.operation_status, OperationStatus::ValidationError);
        assert!(result.domain_data.is_none());
        assert!(result
            .session_info
            .error
            .as_deref()
            .unwrap()
            .contains("full_name"));
    }

    #[tokio::test]
    async fn undecodable_output_becomes_validation_error_envelope() {
        let ai = MockInference::new()
            .with_response(SchemaKind::Resume, serde_json::json!({"unexpected": true}));
        let result: ExtractionResult<Resume> = infer_validated(
            &ai,
            OperationType::ResumeParsing,
            "instructions",
            "input",
            SchemaKind::Resume,
            "Resume parsing failed",
        )
        .await;

        assert_eq!(result.operation_status, OperationStatus::ValidationError);
    }
}
