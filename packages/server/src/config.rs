//! Environment-driven configuration.

use anyhow::{Context, Result};

/// Server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port (`PORT`, default 8080).
    pub port: u16,

    /// Application name used as the session scope (`APP_NAME`).
    pub app_name: String,

    /// Allowed CORS origin (`CORS_ALLOW_ORIGIN`); `None` allows any.
    pub cors_origin: Option<String>,

    /// Inference endpoint key (`OPENAI_API_KEY`).
    pub openai_api_key: String,

    /// Model override (`MODEL_ID`).
    pub model_id: Option<String>,

    /// Inference base URL override (`OPENAI_BASE_URL`).
    pub openai_base_url: Option<String>,

    /// NATS server (`NATS_URL`, default `nats://127.0.0.1:4222`).
    pub nats_url: String,

    /// JetStream subject events are published to (`EVENT_SUBJECT`).
    pub event_subject: String,

    /// SQLite URL for the durable document store (`DATABASE_URL`);
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
}

impl Config {
    /// Load from the environment (a `.env` file is honored when present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a number")?,
            Err(_) => 8080,
        };

        Ok(Self {
            port,
            app_name: std::env::var("APP_NAME").unwrap_or_else(|_| "talentflow".to_string()),
            cors_origin: std::env::var("CORS_ALLOW_ORIGIN").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            model_id: std::env::var("MODEL_ID").ok(),
            openai_base_url: std::env::var("OPENAI_BASE_URL").ok(),
            nats_url: std::env::var("NATS_URL")
                .unwrap_or_else(|_| "nats://127.0.0.1:4222".to_string()),
            event_subject: std::env::var("EVENT_SUBJECT")
                .unwrap_or_else(|_| "talentflow.events".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
        })
    }
}
