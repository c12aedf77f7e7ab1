//! Conversational session state.
//!
//! A session is the durable context for one user within one
//! application, keyed by an opaque id. State is an ordered map of JSON
//! values under a read-modify-write discipline: a turn loads the latest
//! persisted state before mutating and persists the full merged map
//! afterward, never a partial diff.

mod document;
mod memory;

pub use document::DocumentSessionService;
pub use memory::InMemorySessionService;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::result::OperationType;

/// State keys owned by the dispatcher. Sub-components read these,
/// never re-derive them.
pub mod state_keys {
    pub const CONVERSATION_STARTED: &str = "conversation_started";
    pub const INTERACTION_COUNT: &str = "interaction_count";
    pub const LAST_INTERACTION_START: &str = "last_interaction_start";
    pub const LAST_INTERACTION_END: &str = "last_interaction_end";
    pub const LAST_OPERATION_STATUS: &str = "last_operation_status";
    pub const LAST_OPERATION_TYPE: &str = "last_operation_type";
    pub const DOCUMENTS: &str = "documents";
}

/// One entry in a session's ordered event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub timestamp: DateTime<Utc>,
    pub operation_type: Option<OperationType>,
    pub summary: String,
}

/// Durable conversational context for one `(app_name, user_id)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub app_name: String,
    pub user_id: String,
    pub id: String,
    pub state: IndexMap<String, Value>,
    pub last_update_time: DateTime<Utc>,
    #[serde(default)]
    pub events: Vec<SessionEvent>,
}

impl Session {
    /// Create a session, generating an id when none is supplied.
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        state: IndexMap<String, Value>,
        session_id: Option<String>,
    ) -> Self {
        let id = session_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            id,
            state,
            last_update_time: Utc::now(),
            events: Vec::new(),
        }
    }

    /// Current interaction counter (0 before the first turn).
    pub fn interaction_count(&self) -> u64 {
        self.state
            .get(state_keys::INTERACTION_COUNT)
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Advance the interaction counter by exactly one and return the new
    /// value. The dispatcher is the only caller; counters never reset.
    pub fn increment_interaction_count(&mut self) -> u64 {
        let next = self.interaction_count() + 1;
        self.state
            .insert(state_keys::INTERACTION_COUNT.into(), Value::from(next));
        next
    }

    /// Read a string value out of state.
    pub fn state_str(&self, key: &str) -> Option<&str> {
        self.state.get(key).and_then(Value::as_str)
    }

    /// Write a state value, replacing any previous one.
    pub fn set_state(&mut self, key: impl Into<String>, value: Value) {
        self.state.insert(key.into(), value);
    }

    /// The dispatcher-owned map of stored extraction documents.
    pub fn documents(&self) -> Option<&serde_json::Map<String, Value>> {
        self.state.get(state_keys::DOCUMENTS).and_then(Value::as_object)
    }

    /// Record an extraction document under its generated id.
    pub fn store_document(&mut self, document_id: &str, payload: Value) {
        let docs = self
            .state
            .entry(state_keys::DOCUMENTS.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Value::Object(map) = docs {
            map.insert(document_id.to_string(), payload);
        }
    }

    /// Append an event to the ordered log.
    pub fn log_event(&mut self, operation_type: Option<OperationType>, summary: impl Into<String>) {
        self.events.push(SessionEvent {
            timestamp: Utc::now(),
            operation_type,
            summary: summary.into(),
        });
    }

    /// Copy of this session with `events` and `state` elided, for
    /// compact listings.
    pub fn elided(&self) -> Session {
        Session {
            app_name: self.app_name.clone(),
            user_id: self.user_id.clone(),
            id: self.id.clone(),
            state: IndexMap::new(),
            last_update_time: self.last_update_time,
            events: Vec::new(),
        }
    }

    /// Apply a [`GetSessionConfig`] filter to the event log.
    pub(crate) fn apply_config(&mut self, config: &GetSessionConfig) {
        if let Some(after) = config.after_timestamp {
            self.events.retain(|e| e.timestamp >= after);
        }
        if let Some(n) = config.num_recent_events {
            if self.events.len() > n {
                self.events.drain(..self.events.len() - n);
            }
        }
    }
}

/// Restricts how much event history `get_session` returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetSessionConfig {
    /// Keep only the N most recent events.
    pub num_recent_events: Option<usize>,

    /// Keep only events at or after this instant.
    pub after_timestamp: Option<DateTime<Utc>>,
}
