//! Résumé extraction.

use crate::error::Result;
use crate::result::{ExtractionResult, OperationType};
use crate::sanitize::sanitize;
use crate::schemas::{Resume, SchemaKind};
use crate::traits::ai::Inference;

use super::infer_validated;

const INSTRUCTIONS: &str = "You are an expert AI resume parser. Your task is to transform the \
unstructured resume text provided below into a single, structured, and comprehensive JSON object \
suitable for a modern Applicant Tracking System (ATS). Only extract information explicitly \
present in the text. For the awards section, ensure each award entry is a separate object in the \
awards array with its own title, awarder, date, and summary; do not merge multiple awards into \
one object or duplicate keys. For other list fields (certifications, education, work_experience, \
projects, languages), apply the same rule: each list item is separate. Output valid JSON with no \
duplicate keys.";

/// Parses unstructured résumé text into a validated [`Resume`].
pub struct ResumeExtractor<A> {
    ai: A,
}

impl<A: Inference> ResumeExtractor<A> {
    pub fn new(ai: A) -> Self {
        Self { ai }
    }

    /// Extract a candidate profile.
    ///
    /// The only `Err` is sanitizer rejection (`InvalidInput`); every
    /// later failure is absorbed into the returned envelope.
    pub async fn extract(&self, raw_text: &str) -> Result<ExtractionResult<Resume>> {
        let sanitized = sanitize(raw_text)?;
        tracing::debug!(chars = sanitized.len(), "starting resume parsing");

        Ok(infer_validated(
            &self.ai,
            OperationType::ResumeParsing,
            INSTRUCTIONS,
            &sanitized,
            SchemaKind::Resume,
            "Resume parsing failed",
        )
        .await)
    }
}
