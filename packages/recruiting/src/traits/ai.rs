//! Inference seam for LLM operations.
//!
//! Implementations wrap a specific provider and handle the mechanics of
//! prompting and response transport. The pipeline treats the endpoint
//! as a black-box function from instructions + input + schema to a
//! structured object or a failure.

use async_trait::async_trait;

use crate::error::Result;

/// Schema-constrained structured generation.
#[async_trait]
pub trait Inference: Send + Sync {
    /// Run the model against `input` under `instructions`, constraining
    /// output to `schema` (a JSON Schema object). Returns the parsed
    /// JSON value; any transport failure, timeout, or non-conforming
    /// output surfaces as [`crate::error::PipelineError::Inference`].
    async fn generate_structured(
        &self,
        instructions: &str,
        input: &str,
        schema: serde_json::Value,
    ) -> Result<serde_json::Value>;

    /// Name of the model serving this client, for operation metadata.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: Inference + ?Sized> Inference for std::sync::Arc<T> {
    async fn generate_structured(
        &self,
        instructions: &str,
        input: &str,
        schema: serde_json::Value,
    ) -> Result<serde_json::Value> {
        (**self).generate_structured(instructions, input, schema).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
