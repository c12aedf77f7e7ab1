//! Document turn and match endpoints.
//!
//! A failed extraction is a normal business outcome: it returns 200
//! with `operation_status: "error"` in the envelope. Only sanitizer
//! rejection and unknown document references map to 400, and session
//! backend loss during loading to 500.

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use recruiting::{FailureKind, TurnContent, TurnRequest, TurnResponse};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TurnBody {
    pub user_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Raw document text to classify and extract.
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchBody {
    pub user_id: String,
    pub session_id: String,
    pub resume_id: String,
    pub job_posting_id: String,
}

/// Service banner.
pub async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Talentflow API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /turns` — classify and extract one document.
pub async fn turn_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<TurnBody>,
) -> (StatusCode, Json<TurnResponse>) {
    let response = state
        .dispatcher
        .handle_turn(TurnRequest {
            user_id: body.user_id,
            session_id: body.session_id,
            content: TurnContent::Document { text: body.text },
        })
        .await;

    (status_for(&response), Json(response))
}

/// `POST /match` — score two prior extractions against each other.
pub async fn match_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<MatchBody>,
) -> (StatusCode, Json<TurnResponse>) {
    let response = state
        .dispatcher
        .handle_turn(TurnRequest {
            user_id: body.user_id,
            session_id: Some(body.session_id),
            content: TurnContent::Match {
                resume_id: body.resume_id,
                job_posting_id: body.job_posting_id,
            },
        })
        .await;

    (status_for(&response), Json(response))
}

fn status_for(response: &TurnResponse) -> StatusCode {
    match response.outcome.failure_kind() {
        None => StatusCode::OK,
        Some(FailureKind::InvalidInput) | Some(FailureKind::UnknownDocument) => {
            StatusCode::BAD_REQUEST
        }
        Some(FailureKind::SessionUnavailable) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
