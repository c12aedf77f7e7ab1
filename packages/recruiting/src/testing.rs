//! Testing utilities: mock collaborators and schema fixtures.
//!
//! Useful for exercising the pipeline without a model endpoint or a
//! broker. Mocks return deterministic, configurable responses and track
//! calls for assertions.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{PipelineError, PublishError, Result};
use crate::schemas::SchemaKind;
use crate::traits::ai::Inference;
use crate::traits::bus::{EventBus, ReceivedEvent};

/// Record of one call made to [`MockInference`].
#[derive(Debug, Clone)]
pub struct MockInferenceCall {
    /// Which registry schema the call was constrained to, when it
    /// matched a registered one.
    pub kind: Option<SchemaKind>,
    pub input_len: usize,
}

/// Deterministic [`Inference`] double.
///
/// Canned responses are keyed by the registry schema the caller
/// constrains to; unconfigured schemas and injected failures return an
/// inference error.
#[derive(Default)]
pub struct MockInference {
    responses: RwLock<HashMap<SchemaKind, Value>>,
    fail_with: RwLock<Option<String>>,
    calls: RwLock<Vec<MockInferenceCall>>,
}

impl MockInference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned response for calls constrained to `kind`.
    pub fn with_response(self, kind: SchemaKind, response: Value) -> Self {
        self.responses.write().unwrap().insert(kind, response);
        self
    }

    /// Make every call fail with an inference error.
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.fail_with.write().unwrap() = Some(message.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    pub fn calls(&self) -> Vec<MockInferenceCall> {
        self.calls.read().unwrap().clone()
    }

    fn kind_for(schema: &Value) -> Option<SchemaKind> {
        [
            SchemaKind::Resume,
            SchemaKind::JobPosting,
            SchemaKind::CompatibilityScore,
        ]
        .into_iter()
        .find(|kind| &kind.json_schema() == schema)
    }
}

#[async_trait]
impl Inference for MockInference {
    async fn generate_structured(
        &self,
        _instructions: &str,
        input: &str,
        schema: Value,
    ) -> Result<Value> {
        let kind = Self::kind_for(&schema);
        self.calls.write().unwrap().push(MockInferenceCall {
            kind,
            input_len: input.len(),
        });

        if let Some(message) = self.fail_with.read().unwrap().clone() {
            return Err(PipelineError::inference(message));
        }

        let response = kind.and_then(|k| self.responses.read().unwrap().get(&k).cloned());
        response.ok_or_else(|| PipelineError::inference("no canned response for schema"))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// In-process [`EventBus`] double with publish-failure injection.
#[derive(Default)]
pub struct MemoryEventBus {
    queue: Mutex<VecDeque<ReceivedEvent>>,
    log: Mutex<Vec<(String, Vec<u8>)>>,
    failing_publishes: AtomicU32,
    next_id: AtomicU64,
}

impl MemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` publishes fail (`u32::MAX` = fail forever).
    pub fn fail_next_publishes(&self, n: u32) {
        self.failing_publishes.store(n, Ordering::SeqCst);
    }

    /// Every `(name, payload)` successfully published, in order.
    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, name: &str, payload: &[u8]) -> std::result::Result<String, PublishError> {
        let remaining = self.failing_publishes.load(Ordering::SeqCst);
        if remaining > 0 {
            if remaining != u32::MAX {
                self.failing_publishes.store(remaining - 1, Ordering::SeqCst);
            }
            return Err(PublishError::transport("injected bus failure"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let message_id = id.to_string();
        self.queue.lock().unwrap().push_back(ReceivedEvent {
            message_id: message_id.clone(),
            event: Some(name.to_string()),
            data: payload.to_vec(),
        });
        self.log
            .lock()
            .unwrap()
            .push((name.to_string(), payload.to_vec()));
        Ok(message_id)
    }

    async fn pull(
        &self,
        max_messages: usize,
    ) -> std::result::Result<Vec<ReceivedEvent>, PublishError> {
        let mut queue = self.queue.lock().unwrap();
        let take = max_messages.min(queue.len());
        Ok(queue.drain(..take).collect())
    }
}

/// A valid résumé payload as the model would return it.
pub fn resume_fixture() -> Value {
    json!({
        "personal_details": {
            "full_name": "Jane Doe",
            "email": "jane.doe@example.com",
            "phone_number": "+1 555 0100",
            "location": {
                "address": null,
                "postalCode": "55401",
                "city": "Minneapolis",
                "countryCode": "US",
                "region": "MN"
            },
            "links": [
                {"type": "GitHub", "url": "https://github.com/janedoe"}
            ]
        },
        "professional_summary": "Data engineer with seven years of pipeline work.",
        "inferred_experience_level": "Senior",
        "total_years_experience": 7.0,
        "work_experience": [
            {
                "job_title": "Data Engineer",
                "company": "Acme Analytics",
                "location": "Minneapolis, MN",
                "start_date": "2019-03",
                "end_date": null,
                "is_current": true,
                "responsibilities": ["Built ingestion pipelines", "Owned the warehouse model"]
            }
        ],
        "education": [
            {
                "institution": "University of Minnesota",
                "degree": "BSc",
                "field_of_study": "Computer Science",
                "start_date": "2012-09",
                "graduation_date": "2016-06"
            }
        ],
        "skills": {
            "technical": {
                "programming_languages": ["Python", "SQL"],
                "frameworks_libraries": ["Airflow"],
                "databases": ["PostgreSQL"],
                "cloud_platforms": ["GCP"],
                "tools_technologies": ["dbt"]
            },
            "soft_skills": ["Mentoring"]
        },
        "certifications": null,
        "projects": null,
        "languages": [
            {"language": "English", "proficiency": "Native"}
        ],
        "awards": null,
        "volunteers": null
    })
}

/// A valid job posting payload as the model would return it.
pub fn job_posting_fixture() -> Value {
    json!({
        "job_title": "Machine Learning Engineer",
        "company": {
            "name": "Acme Analytics",
            "description": "Retail analytics",
            "website_url": "https://acme.example.com",
            "application_email": "jobs@acme.example.com"
        },
        "location": {
            "city": "Minneapolis",
            "state": "MN",
            "countryCode": "US",
            "remote": true
        },
        "years_of_experience": "3+ years",
        "key_responsibilities": [
            "Deploy ML models to production",
            "Own model monitoring"
        ],
        "required_skills": {
            "programming_languages": ["Python"],
            "frameworks_libraries": ["TensorFlow"],
            "databases": null,
            "cloud_platforms": ["GCP"],
            "tools_technologies": null
        },
        "required_qualifications": [
            {"institution": "Any accredited university", "degree": "BSc", "field_of_study": "CS"}
        ],
        "industry_type": "IT",
        "salary_range": "$140k-$170k",
        "base_salary": {
            "amount": 155000.0,
            "currency": "USD",
            "unit": "per year",
            "description": null
        },
        "type_of_employment": "Full-time",
        "date_posted": "2026-07-01",
        "validThrough": "2026-12-31T00:00:00Z"
    })
}

/// A valid compatibility score payload as the model would return it.
pub fn compatibility_fixture() -> Value {
    json!({
        "compatibility_score": 85,
        "summary": "Strong overlap in Python and cloud tooling; missing TensorFlow depth.",
        "matching_skills": ["Python", "GCP"],
        "missing_skills": ["TensorFlow"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{CompatibilityScore, JobPosting, Resume, Validated};

    #[test]
    fn fixtures_decode_and_validate() {
        let resume: Resume = serde_json::from_value(resume_fixture()).unwrap();
        resume.validate().unwrap();

        let posting: JobPosting = serde_json::from_value(job_posting_fixture()).unwrap();
        posting.validate().unwrap();

        let score: CompatibilityScore = serde_json::from_value(compatibility_fixture()).unwrap();
        score.validate().unwrap();
    }

    #[tokio::test]
    async fn mock_inference_matches_schema_kind() {
        let mock = MockInference::new().with_response(SchemaKind::Resume, resume_fixture());

        let out = mock
            .generate_structured("i", "text", SchemaKind::Resume.json_schema())
            .await
            .unwrap();
        assert_eq!(out["personal_details"]["full_name"], "Jane Doe");

        let err = mock
            .generate_structured("i", "text", SchemaKind::JobPosting.json_schema())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no canned response"));

        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.calls()[0].kind, Some(SchemaKind::Resume));
    }

    #[tokio::test]
    async fn memory_bus_queues_and_pulls() {
        let bus = MemoryEventBus::new();
        bus.publish("E1", b"one").await.unwrap();
        bus.publish("E2", b"two").await.unwrap();

        let pulled = bus.pull(1).await.unwrap();
        assert_eq!(pulled.len(), 1);
        assert_eq!(pulled[0].event.as_deref(), Some("E1"));

        let pulled = bus.pull(10).await.unwrap();
        assert_eq!(pulled.len(), 1);
        assert_eq!(pulled[0].data, b"two");
    }
}
