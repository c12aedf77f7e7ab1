//! Inference endpoint clients.

mod openai;

pub use openai::OpenAI;
