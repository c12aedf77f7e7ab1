//! Session inspection endpoints.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use recruiting::session::state_keys;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionListing {
    pub user_id: String,
    pub total_sessions: usize,
    pub sessions: Vec<SessionListEntry>,
}

#[derive(Serialize)]
pub struct SessionListEntry {
    pub session_id: String,
    pub last_update_time: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub user_id: String,
    pub app_name: String,
    pub interaction_count: u64,
    pub conversation_started: Option<String>,
    pub last_interaction_start: Option<String>,
    pub last_interaction_end: Option<String>,
    pub last_operation_status: Option<String>,
    pub state_keys: Vec<String>,
}

/// `GET /users/:user_id/sessions` — identities only, state elided.
pub async fn list_sessions_handler(
    Extension(state): Extension<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SessionListing>, ApiError> {
    let sessions = state
        .sessions
        .list_sessions(&state.app_name, &user_id)
        .await?;

    let entries: Vec<SessionListEntry> = sessions
        .into_iter()
        .map(|s| SessionListEntry {
            session_id: s.id,
            last_update_time: s.last_update_time,
        })
        .collect();

    Ok(Json(SessionListing {
        user_id,
        total_sessions: entries.len(),
        sessions: entries,
    }))
}

/// `GET /users/:user_id/sessions/:session_id` — state summary.
pub async fn get_session_handler(
    Extension(state): Extension<AppState>,
    Path((user_id, session_id)): Path<(String, String)>,
) -> Result<Json<SessionSummary>, ApiError> {
    let session = state
        .sessions
        .get_session(&state.app_name, &user_id, &session_id, None)
        .await?
        .ok_or(ApiError::NotFound)?;

    let state_str =
        |key: &str| session.state_str(key).map(str::to_string);

    Ok(Json(SessionSummary {
        session_id: session.id.clone(),
        user_id: session.user_id.clone(),
        app_name: session.app_name.clone(),
        interaction_count: session.interaction_count(),
        conversation_started: state_str(state_keys::CONVERSATION_STARTED),
        last_interaction_start: state_str(state_keys::LAST_INTERACTION_START),
        last_interaction_end: state_str(state_keys::LAST_INTERACTION_END),
        last_operation_status: state_str(state_keys::LAST_OPERATION_STATUS),
        state_keys: session.state.keys().cloned().collect(),
    }))
}

/// `DELETE /users/:user_id/sessions/:session_id` — administrative delete.
pub async fn delete_session_handler(
    Extension(state): Extension<AppState>,
    Path((user_id, session_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .delete_session(&state.app_name, &user_id, &session_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
