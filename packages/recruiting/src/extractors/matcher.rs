//! Candidate-to-role compatibility scoring.

use serde_json::Value;

use crate::result::{ExtractionResult, OperationType};
use crate::schemas::{CompatibilityScore, SchemaKind};
use crate::traits::ai::Inference;

use super::infer_validated;

const INSTRUCTIONS: &str = "You are an expert recruitment assistant. Your task is to generate a \
compatibility score between the provided resume and job posting data. Analyze the skills, \
experience, and qualifications in both documents and provide a score from 0 to 100, along with a \
summary of the match, the matching skills, and the missing skills.";

/// Scores how well a parsed résumé matches a parsed job posting.
pub struct MatchScorer<A> {
    ai: A,
}

impl<A: Inference> MatchScorer<A> {
    pub fn new(ai: A) -> Self {
        Self { ai }
    }

    /// Score two previously extracted documents.
    ///
    /// Inputs are already structured, so there is no sanitizer `Err`
    /// path; every failure is absorbed into the returned envelope.
    pub async fn score(
        &self,
        resume_data: &Value,
        job_posting_data: &Value,
    ) -> ExtractionResult<CompatibilityScore> {
        let input = format!("Resume: {resume_data}\n\nJob Posting: {job_posting_data}");
        tracing::debug!("generating compatibility score");

        infer_validated(
            &self.ai,
            OperationType::CompatibilityScore,
            INSTRUCTIONS,
            &input,
            SchemaKind::CompatibilityScore,
            "Compatibility scoring failed",
        )
        .await
    }
}
