//! HTTP surface and event consumer for the recruiting pipeline.

pub mod app;
pub mod bus;
pub mod config;
pub mod consumer;
pub mod error;
pub mod routes;
pub mod state;

pub use app::build_app;
pub use bus::NatsEventBus;
pub use config::Config;
pub use state::{AppDispatcher, AppState};
