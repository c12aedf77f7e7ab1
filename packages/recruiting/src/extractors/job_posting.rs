//! Job posting analysis.

use crate::error::Result;
use crate::result::{ExtractionResult, OperationType};
use crate::sanitize::sanitize;
use crate::schemas::{JobPosting, SchemaKind};
use crate::traits::ai::Inference;

use super::infer_validated;

const INSTRUCTIONS: &str = "You are an expert AI job posting analyzer. Your task is to transform \
the unstructured job posting text provided below into a single, structured JSON object capturing \
the role, the hiring organization, the location, required skills and qualifications, key \
responsibilities, and compensation details where available. Only extract information explicitly \
present in the text. Each list field item is a separate entry; do not merge entries or duplicate \
keys. Output valid JSON with no duplicate keys.";

/// Analyzes unstructured job posting text into a validated [`JobPosting`].
pub struct JobPostingExtractor<A> {
    ai: A,
}

impl<A: Inference> JobPostingExtractor<A> {
    pub fn new(ai: A) -> Self {
        Self { ai }
    }

    /// Extract a job posting.
    ///
    /// The only `Err` is sanitizer rejection (`InvalidInput`); every
    /// later failure is absorbed into the returned envelope.
    pub async fn extract(&self, raw_text: &str) -> Result<ExtractionResult<JobPosting>> {
        let sanitized = sanitize(raw_text)?;
        tracing::debug!(chars = sanitized.len(), "starting job posting analysis");

        Ok(infer_validated(
            &self.ai,
            OperationType::JobPostingAnalysis,
            INSTRUCTIONS,
            &sanitized,
            SchemaKind::JobPosting,
            "Job posting analysis failed",
        )
        .await)
    }
}
