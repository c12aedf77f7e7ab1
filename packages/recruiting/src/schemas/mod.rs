//! Strict data contracts for every document type the pipeline extracts.
//!
//! Each registered schema declares required vs. optional fields,
//! field-level constraints (length ceilings, enumerated values, URL /
//! email / country-code patterns), and nesting. Validation is
//! all-or-nothing per document: the first violation rejects the whole
//! extraction with a `validation_error` status. Constraints exist to
//! reject obviously malicious or malformed content before the object is
//! trusted by downstream consumers. No network, no state.

mod compatibility;
mod job_posting;
mod resume;
pub(crate) mod validate;

pub use compatibility::CompatibilityScore;
pub use job_posting::{BaseSalary, EducationRequirement, HiringOrg, JobLocation, JobPosting};
pub use resume::{
    Award, Certification, Education, ExperienceLevel, Language, LanguageProficiency, Link,
    LinkKind, Location, PersonalDetails, Project, Resume, Skills, TechnicalSkills, Volunteer,
    WorkExperience,
};

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

use crate::error::SchemaViolation;

/// The three registered document contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Resume,
    JobPosting,
    CompatibilityScore,
}

impl SchemaKind {
    /// JSON Schema used to constrain the inference endpoint's output.
    /// The root schema carries the definitions nested contracts
    /// reference.
    pub fn json_schema(&self) -> serde_json::Value {
        let schema = match self {
            Self::Resume => schema_for!(Resume),
            Self::JobPosting => schema_for!(JobPosting),
            Self::CompatibilityScore => schema_for!(CompatibilityScore),
        };
        serde_json::to_value(schema).unwrap_or_default()
    }
}

/// A document type that can be decoded from model output and checked
/// against its registry constraints.
pub trait Validated: DeserializeOwned + JsonSchema {
    /// Walk every field constraint; first violation aborts the document.
    fn validate(&self) -> Result<(), SchemaViolation>;
}
