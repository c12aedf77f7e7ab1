// Downstream persistence consumer: bus -> document store

use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recruiting::{MemoryDocumentStore, SqliteDocumentStore};
use server_core::{consumer, NatsEventBus};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Talentflow event consumer");

    // The consumer only needs the bus and store settings; an inference
    // key is not required here.
    dotenvy::dotenv().ok();
    let nats_url =
        std::env::var("NATS_URL").unwrap_or_else(|_| "nats://127.0.0.1:4222".to_string());
    let event_subject =
        std::env::var("EVENT_SUBJECT").unwrap_or_else(|_| "talentflow.events".to_string());

    let bus = NatsEventBus::connect(&nats_url, event_subject)
        .await
        .context("Failed to connect to NATS")?
        .with_consumer_name("talentflow-saver");

    match std::env::var("DATABASE_URL").ok() {
        Some(url) => {
            let store = SqliteDocumentStore::new(&url)
                .await
                .context("Failed to open document store")?;
            consumer::run(bus, store, Duration::from_secs(2)).await;
        }
        None => {
            tracing::warn!("DATABASE_URL not set, persisting to an in-memory store");
            consumer::run(bus, MemoryDocumentStore::new(), Duration::from_secs(2)).await;
        }
    }

    Ok(())
}
