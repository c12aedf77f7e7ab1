//! Shared application state.
//!
//! Collaborators are constructed once in `main` and injected here; no
//! module-level globals.

use std::sync::Arc;

use recruiting::{Dispatcher, EventBus, Inference, SessionService};

/// Dispatcher over type-erased collaborators, so the route layer does
/// not care which backends were selected at startup.
pub type AppDispatcher =
    Dispatcher<dyn Inference, Arc<dyn SessionService>, Arc<dyn EventBus>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<AppDispatcher>,
    pub sessions: Arc<dyn SessionService>,
    pub app_name: String,
}

impl AppState {
    pub fn new(
        dispatcher: Arc<AppDispatcher>,
        sessions: Arc<dyn SessionService>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            dispatcher,
            sessions,
            app_name: app_name.into(),
        }
    }
}
