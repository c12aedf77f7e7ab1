//! Candidate-to-role compatibility contract.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Validated;
use crate::error::SchemaViolation;

/// How well a candidate profile matches a job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompatibilityScore {
    /// 0 to 100.
    pub compatibility_score: u8,

    /// Why the score was given: key strengths and weaknesses.
    pub summary: String,

    /// Skills in the profile that the posting asks for.
    pub matching_skills: Option<Vec<String>>,

    /// Skills the posting asks for that the profile lacks.
    pub missing_skills: Option<Vec<String>>,
}

impl Validated for CompatibilityScore {
    fn validate(&self) -> Result<(), SchemaViolation> {
        if self.compatibility_score > 100 {
            return Err(SchemaViolation::new(
                "compatibility_score",
                "must be between 0 and 100",
            ));
        }
        if self.summary.trim().is_empty() {
            return Err(SchemaViolation::new("summary", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bounds_enforced() {
        let score = CompatibilityScore {
            compatibility_score: 101,
            summary: "strong match".into(),
            ..Default::default()
        };
        assert!(score.validate().is_err());
    }

    #[test]
    fn empty_summary_rejected() {
        let score = CompatibilityScore {
            compatibility_score: 80,
            summary: "  ".into(),
            ..Default::default()
        };
        assert!(score.validate().is_err());
    }

    #[test]
    fn valid_score_passes() {
        let score = CompatibilityScore {
            compatibility_score: 85,
            summary: "Strong overlap in Python and SQL".into(),
            matching_skills: Some(vec!["Python".into(), "SQL".into()]),
            missing_skills: Some(vec!["Kubernetes".into()]),
        };
        assert!(score.validate().is_ok());
    }
}
