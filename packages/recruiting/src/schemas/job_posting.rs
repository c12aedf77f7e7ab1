//! Job posting contract.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::resume::TechnicalSkills;
use super::validate;
use super::Validated;
use crate::error::SchemaViolation;

/// Where the role is located.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    /// ISO-3166-1 alpha-2, e.g. US, AU, IN.
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
    pub remote: Option<bool>,
}

/// The hiring organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HiringOrg {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub application_email: Option<String>,
}

/// Salary expressed as amount + currency + unit, when the posting has one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BaseSalary {
    pub amount: Option<f64>,
    /// e.g. USD, EUR
    pub currency: Option<String>,
    /// e.g. per year, per month, per hour
    pub unit: Option<String>,
    pub description: Option<String>,
}

/// A qualification the role requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EducationRequirement {
    pub institution: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
}

/// A structured job posting extracted from free-text input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobPosting {
    pub job_title: String,
    pub company: Option<HiringOrg>,
    pub location: JobLocation,
    /// e.g. "3+ years", "5-7 years"
    pub years_of_experience: Option<String>,
    pub key_responsibilities: Vec<String>,
    pub required_skills: TechnicalSkills,
    pub required_qualifications: Option<Vec<EducationRequirement>>,
    /// e.g. Manufacturing, IT, Finance, Insurance
    pub industry_type: Option<String>,
    pub salary_range: Option<String>,
    pub base_salary: Option<BaseSalary>,
    /// e.g. Full-time, Part-time, Contract, Internship
    pub type_of_employment: Option<String>,
    pub date_posted: Option<String>,
    /// ISO 8601 instant after which the posting expires.
    #[serde(rename = "validThrough")]
    pub valid_through: Option<DateTime<Utc>>,
}

impl Validated for JobPosting {
    fn validate(&self) -> Result<(), SchemaViolation> {
        validate::max_len("job_title", &self.job_title, 200)?;
        validate::no_markup("job_title", &self.job_title)?;
        validate::opt_country_code("location.countryCode", self.country_code())?;
        if let Some(company) = &self.company {
            validate::opt_url("company.website_url", company.website_url.as_deref())?;
            validate::opt_email(
                "company.application_email",
                company.application_email.as_deref(),
            )?;
        }
        for (i, resp) in self.key_responsibilities.iter().enumerate() {
            validate::max_len(&format!("key_responsibilities[{i}]"), resp, 1000)?;
        }
        Ok(())
    }
}

impl JobPosting {
    fn country_code(&self) -> Option<&str> {
        self.location.country_code.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_posting(title: &str) -> JobPosting {
        JobPosting {
            job_title: title.to_string(),
            key_responsibilities: vec!["Build things".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn minimal_posting_is_valid() {
        assert!(minimal_posting("Machine Learning Engineer").validate().is_ok());
    }

    #[test]
    fn rejects_markup_in_title() {
        assert!(minimal_posting("<h1>Engineer</h1>").validate().is_err());
    }

    #[test]
    fn rejects_bad_company_website() {
        let mut posting = minimal_posting("Engineer");
        posting.company = Some(HiringOrg {
            website_url: Some("javascript:alert(1)".into()),
            ..Default::default()
        });
        let err = posting.validate().unwrap_err();
        assert_eq!(err.field, "company.website_url");
    }

    #[test]
    fn rejects_overlong_responsibility() {
        let mut posting = minimal_posting("Engineer");
        posting.key_responsibilities.push("x".repeat(1001));
        let err = posting.validate().unwrap_err();
        assert!(err.field.starts_with("key_responsibilities[1]"));
    }

    #[test]
    fn valid_through_round_trips_iso8601() {
        let mut posting = minimal_posting("Engineer");
        posting.valid_through = Some("2026-12-31T00:00:00Z".parse().unwrap());
        let json = serde_json::to_value(&posting).unwrap();
        assert!(json["validThrough"].as_str().unwrap().starts_with("2026-12-31"));
        let back: JobPosting = serde_json::from_value(json).unwrap();
        assert_eq!(back.valid_through, posting.valid_through);
    }
}
