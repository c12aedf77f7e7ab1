//! Candidate profile contract.
//!
//! Mirrors the shape an applicant-tracking system expects: personal
//! details plus independently-validated lists of work experience,
//! education, skills, certifications, projects, languages, awards, and
//! volunteer work.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::validate;
use super::Validated;
use crate::error::SchemaViolation;

/// A postal location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    /// Multiple address lines are separated with `\n`.
    pub address: Option<String>,
    #[serde(rename = "postalCode")]
    pub postal_code: Option<String>,
    pub city: Option<String>,
    /// ISO-3166-1 alpha-2, e.g. US, AU, IN.
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
    /// US state, province, or similar.
    pub region: Option<String>,
}

impl Location {
    fn validate(&self, prefix: &str) -> Result<(), SchemaViolation> {
        validate::opt_max_len(
            &format!("{prefix}.address"),
            self.address.as_deref(),
            500,
        )?;
        validate::opt_country_code(
            &format!("{prefix}.countryCode"),
            self.country_code.as_deref(),
        )
    }
}

/// Professional profile link kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LinkKind {
    LinkedIn,
    GitHub,
    Portfolio,
    Other,
}

/// A link to a professional profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Link {
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub url: String,
}

/// Contact block; `full_name` is the only field every profile must have.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonalDetails {
    pub full_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<Location>,
    pub links: Option<Vec<Link>>,
}

impl PersonalDetails {
    fn validate(&self) -> Result<(), SchemaViolation> {
        validate::max_len("personal_details.full_name", &self.full_name, 100)?;
        validate::no_markup("personal_details.full_name", &self.full_name)?;
        validate::opt_email("personal_details.email", self.email.as_deref())?;
        if let Some(location) = &self.location {
            location.validate("personal_details.location")?;
        }
        for (i, link) in self.links.iter().flatten().enumerate() {
            validate::url(&format!("personal_details.links[{i}].url"), &link.url)?;
        }
        Ok(())
    }
}

/// One employment entry; each is validated independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkExperience {
    pub job_title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_current: bool,
    pub responsibilities: Option<Vec<String>>,
}

impl WorkExperience {
    fn validate(&self, prefix: &str) -> Result<(), SchemaViolation> {
        for (i, resp) in self.responsibilities.iter().flatten().enumerate() {
            validate::max_len(&format!("{prefix}.responsibilities[{i}]"), resp, 1000)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Education {
    pub institution: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub graduation_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TechnicalSkills {
    pub programming_languages: Option<Vec<String>>,
    pub frameworks_libraries: Option<Vec<String>>,
    pub databases: Option<Vec<String>>,
    pub cloud_platforms: Option<Vec<String>>,
    pub tools_technologies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Skills {
    pub technical: Option<TechnicalSkills>,
    pub soft_skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Certification {
    pub name: String,
    pub issuing_organization: String,
    pub date_issued: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    pub name: String,
    pub description: Option<String>,
    pub technologies_used: Option<Vec<String>>,
    pub link: Option<String>,
}

/// Spoken-language proficiency levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LanguageProficiency {
    Native,
    Fluent,
    Professional,
    Conversational,
    Basic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Language {
    pub language: String,
    pub proficiency: LanguageProficiency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Award {
    /// e.g. One of the 100 greatest minds of the century
    pub title: Option<String>,
    pub date: Option<String>,
    /// e.g. Time Magazine
    pub awarder: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Volunteer {
    pub organization: Option<String>,
    pub position: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub summary: Option<String>,
    pub highlights: Option<Vec<String>>,
}

/// Experience seniority inferred from the document as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ExperienceLevel {
    #[serde(rename = "Entry-Level")]
    EntryLevel,
    Junior,
    #[serde(rename = "Mid-Level")]
    MidLevel,
    Senior,
    Lead,
    Principal,
    Executive,
}

/// A structured candidate profile extracted from free-text résumé input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Resume {
    pub personal_details: PersonalDetails,
    pub professional_summary: Option<String>,
    pub inferred_experience_level: Option<ExperienceLevel>,
    pub total_years_experience: Option<f64>,
    pub work_experience: Option<Vec<WorkExperience>>,
    pub education: Option<Vec<Education>>,
    pub skills: Option<Skills>,
    pub certifications: Option<Vec<Certification>>,
    pub projects: Option<Vec<Project>>,
    pub languages: Option<Vec<Language>>,
    pub awards: Option<Vec<Award>>,
    pub volunteers: Option<Vec<Volunteer>>,
}

impl Validated for Resume {
    fn validate(&self) -> Result<(), SchemaViolation> {
        self.personal_details.validate()?;
        for (i, entry) in self.work_experience.iter().flatten().enumerate() {
            entry.validate(&format!("work_experience[{i}]"))?;
        }
        for (i, project) in self.projects.iter().flatten().enumerate() {
            validate::opt_url(&format!("projects[{i}].link"), project.link.as_deref())?;
        }
        for (i, volunteer) in self.volunteers.iter().flatten().enumerate() {
            validate::opt_url(&format!("volunteers[{i}].url"), volunteer.url.as_deref())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_resume(full_name: &str) -> Resume {
        Resume {
            personal_details: PersonalDetails {
                full_name: full_name.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn minimal_resume_is_valid() {
        assert!(minimal_resume("Jane Doe").validate().is_ok());
    }

    #[test]
    fn rejects_markup_in_full_name() {
        let err = minimal_resume("Jane <script>x</script>").validate().unwrap_err();
        assert_eq!(err.field, "personal_details.full_name");
    }

    #[test]
    fn rejects_overlong_full_name() {
        assert!(minimal_resume(&"x".repeat(101)).validate().is_err());
    }

    #[test]
    fn rejects_bad_email_and_bad_link() {
        let mut resume = minimal_resume("Jane Doe");
        resume.personal_details.email = Some("nope".into());
        assert!(resume.validate().is_err());

        resume.personal_details.email = Some("jane@example.com".into());
        resume.personal_details.links = Some(vec![Link {
            kind: LinkKind::GitHub,
            url: "ftp://github.com/jane".into(),
        }]);
        let err = resume.validate().unwrap_err();
        assert!(err.field.contains("links[0].url"));
    }

    #[test]
    fn each_work_entry_validated_independently() {
        let mut resume = minimal_resume("Jane Doe");
        resume.work_experience = Some(vec![
            WorkExperience {
                job_title: "Engineer".into(),
                company: "Acme".into(),
                location: None,
                start_date: "2020-01".into(),
                end_date: None,
                is_current: true,
                responsibilities: Some(vec!["ok".into()]),
            },
            WorkExperience {
                job_title: "Intern".into(),
                company: "Acme".into(),
                location: None,
                start_date: "2019-01".into(),
                end_date: Some("2019-12".into()),
                is_current: false,
                responsibilities: Some(vec!["r".repeat(1001)]),
            },
        ]);
        let err = resume.validate().unwrap_err();
        assert!(err.field.starts_with("work_experience[1]"));
    }

    #[test]
    fn country_code_pattern_enforced() {
        let mut resume = minimal_resume("Jane Doe");
        resume.personal_details.location = Some(Location {
            country_code: Some("usa".into()),
            ..Default::default()
        });
        assert!(resume.validate().is_err());
    }

    #[test]
    fn wire_format_uses_original_field_names() {
        let mut resume = minimal_resume("Jane Doe");
        resume.personal_details.location = Some(Location {
            country_code: Some("US".into()),
            postal_code: Some("55401".into()),
            ..Default::default()
        });
        let json = serde_json::to_value(&resume).unwrap();
        let location = &json["personal_details"]["location"];
        assert_eq!(location["countryCode"], "US");
        assert_eq!(location["postalCode"], "55401");
    }

    #[test]
    fn experience_level_serializes_hyphenated() {
        let json = serde_json::to_value(ExperienceLevel::EntryLevel).unwrap();
        assert_eq!(json, "Entry-Level");
        let json = serde_json::to_value(ExperienceLevel::MidLevel).unwrap();
        assert_eq!(json, "Mid-Level");
    }
}
