//! Document-type classification.
//!
//! Keyword-indicator scoring over the incoming text. Deterministic:
//! identical input always classifies identically. Equal scores classify
//! as résumé; that tie-break is a documented policy choice, preserved
//! deliberately rather than inferred from evidence.

use serde::Serialize;

/// Keywords that weight toward a job posting.
const JOB_POSTING_KEYWORDS: &[&str] = &[
    "responsibilities",
    "requirements",
    "qualifications",
    "we are seeking",
    "job description",
    "position",
    "role",
    "company",
    "salary",
    "benefits",
    "apply",
    "hiring",
    "candidate",
    "experience required",
];

/// Keywords that weight toward a résumé.
const RESUME_KEYWORDS: &[&str] = &[
    "education",
    "work experience",
    "skills",
    "projects",
    "certifications",
    "objective",
    "summary",
    "achievements",
    "accomplishments",
];

/// Which extractor a document turn routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    JobPosting,
}

/// Classification outcome with the per-type indicator scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub kind: DocumentKind,
    pub resume_score: usize,
    pub job_posting_score: usize,
}

/// Score keyword-indicator presence and pick the document type.
pub fn classify(text: &str) -> Classification {
    let lowered = text.to_lowercase();

    let job_posting_score = JOB_POSTING_KEYWORDS
        .iter()
        .filter(|k| lowered.contains(*k))
        .count();
    let resume_score = RESUME_KEYWORDS
        .iter()
        .filter(|k| lowered.contains(*k))
        .count();

    let kind = if job_posting_score > resume_score {
        DocumentKind::JobPosting
    } else {
        DocumentKind::Resume
    };

    Classification {
        kind,
        resume_score,
        job_posting_score,
    }
}
