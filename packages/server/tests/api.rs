//! HTTP surface tests over mock collaborators.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use recruiting::testing::{resume_fixture, MemoryEventBus, MockInference};
use recruiting::{
    Dispatcher, EventBus, EventPublisher, InMemorySessionService, Inference, RetryPolicy,
    SchemaKind, SessionService,
};
use server_core::{build_app, AppState};

const APP: &str = "talentflow";

fn test_app() -> axum::Router {
    let ai: Arc<dyn Inference> =
        Arc::new(MockInference::new().with_response(SchemaKind::Resume, resume_fixture()));
    let sessions: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());
    let bus: Arc<dyn EventBus> = Arc::new(MemoryEventBus::new());

    let dispatcher = Arc::new(Dispatcher::new(
        ai,
        sessions.clone(),
        EventPublisher::new(bus).with_retry(RetryPolicy::immediate(3)),
        APP,
    ));

    build_app(AppState::new(dispatcher, sessions, APP), None)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn turn_endpoint_returns_envelope() {
    let app = test_app();
    let response = app
        .oneshot(post_json(
            "/turns",
            serde_json::json!({
                "user_id": "u1",
                "text": "Education\nWork Experience\nSkills: Python, SQL"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["outcome"]["type"], "resume");
    assert_eq!(body["outcome"]["result"]["operation_status"], "success");
    assert_eq!(body["session"]["interaction_number"], 1);
    assert_eq!(body["session"]["user_id"], "u1");
}

#[tokio::test]
async fn oversized_document_is_a_400() {
    let app = test_app();
    let response = app
        .oneshot(post_json(
            "/turns",
            serde_json::json!({
                "user_id": "u1",
                "text": "a".repeat(60_000)
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["outcome"]["type"], "failed");
    assert_eq!(body["outcome"]["error"], "invalid_input");
}

#[tokio::test]
async fn match_with_unknown_documents_is_a_400() {
    let app = test_app();

    // Establish a session with one turn first.
    let first = app
        .clone()
        .oneshot(post_json(
            "/turns",
            serde_json::json!({"user_id": "u1", "text": "Education and skills"}),
        ))
        .await
        .unwrap();
    let session_id = body_json(first).await["session"]["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(post_json(
            "/match",
            serde_json::json!({
                "user_id": "u1",
                "session_id": session_id,
                "resume_id": "missing",
                "job_posting_id": "missing"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn session_endpoints_inspect_and_delete() {
    let app = test_app();

    let first = app
        .clone()
        .oneshot(post_json(
            "/turns",
            serde_json::json!({"user_id": "u1", "text": "Education and work experience"}),
        ))
        .await
        .unwrap();
    let session_id = body_json(first).await["session"]["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    // List
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/u1/sessions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_sessions"], 1);

    // Summary
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/users/u1/sessions/{session_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["interaction_count"], 1);
    assert!(body["conversation_started"].is_string());

    // Delete, then the summary is gone.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/users/u1/sessions/{session_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/users/u1/sessions/{session_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
