// Main entry point for the Talentflow API server

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recruiting::ai::OpenAI;
use recruiting::{
    Dispatcher, DocumentSessionService, EventPublisher, Inference, SessionService,
    SqliteDocumentStore,
};
use server_core::{build_app, AppState, Config, NatsEventBus};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,recruiting=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Talentflow API");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(app_name = %config.app_name, "Configuration loaded");

    // Inference endpoint
    let mut ai = OpenAI::new(config.openai_api_key.clone());
    if let Some(model) = &config.model_id {
        ai = ai.with_model(model.clone());
    }
    if let Some(base_url) = &config.openai_base_url {
        ai = ai.with_base_url(base_url.clone());
    }
    let ai: Arc<dyn Inference> = Arc::new(ai);

    // Message bus
    let bus = NatsEventBus::connect(&config.nats_url, config.event_subject.clone())
        .await
        .context("Failed to connect to NATS")?;
    let bus: Arc<dyn recruiting::EventBus> = Arc::new(bus);

    // Session backend: durable over SQLite when DATABASE_URL is set,
    // in-process otherwise.
    let sessions: Arc<dyn SessionService> = match &config.database_url {
        Some(url) => {
            let store = SqliteDocumentStore::new(url)
                .await
                .context("Failed to open document store")?;
            tracing::info!("Using SQLite-backed session store");
            Arc::new(DocumentSessionService::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, sessions are volatile");
            Arc::new(recruiting::InMemorySessionService::new())
        }
    };

    // Dependency-injected dispatcher; lifecycle owned here, not by a
    // module-level global.
    let dispatcher = Arc::new(Dispatcher::new(
        ai,
        sessions.clone(),
        EventPublisher::new(bus),
        config.app_name.clone(),
    ));

    let state = AppState::new(dispatcher, sessions, config.app_name.clone());
    let app = build_app(state, config.cors_origin.as_deref());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
