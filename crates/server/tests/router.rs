//! Router tests over scripted backends

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use branch_assistant_analytics::{AnalyticsError, AnalyticsSource, DateRange};
use branch_assistant_config::Settings;
use branch_assistant_core::{BranchComparison, FootfallDay, JsonFileSessionRepository, RealTimeStats};
use branch_assistant_llm::{BackendHealth, ChatBackend, LlmError};
use branch_assistant_server::{create_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

struct OfflineBackend;

#[async_trait]
impl ChatBackend for OfflineBackend {
    async fn health(&self) -> Result<BackendHealth, LlmError> {
        Err(LlmError::Network("connection refused".into()))
    }

    async fn chat(&self, _message: &str) -> Result<String, LlmError> {
        Err(LlmError::Network("connection refused".into()))
    }

    fn endpoint(&self) -> &str {
        "http://llm.test"
    }
}

/// Health probe that never answers in time
struct HangingBackend;

#[async_trait]
impl ChatBackend for HangingBackend {
    async fn health(&self) -> Result<BackendHealth, LlmError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(LlmError::Network("late".into()))
    }

    async fn chat(&self, _message: &str) -> Result<String, LlmError> {
        Err(LlmError::Network("connection refused".into()))
    }

    fn endpoint(&self) -> &str {
        "http://hung.test"
    }
}

struct StaticAnalytics;

#[async_trait]
impl AnalyticsSource for StaticAnalytics {
    async fn footfall_trends(&self, _range: &DateRange) -> Result<Vec<FootfallDay>, AnalyticsError> {
        Ok(vec![FootfallDay::new("2025-01-01", [("siruseri", 40), ("tnagar", 35), ("navalur", 25)])])
    }

    async fn branch_comparison(&self, _range: &DateRange) -> Result<Vec<BranchComparison>, AnalyticsError> {
        Ok(vec![])
    }

    async fn real_time_stats(&self) -> Result<RealTimeStats, AnalyticsError> {
        Ok(RealTimeStats::default())
    }

    async fn refresh_data_context(&self) -> Result<(), AnalyticsError> {
        Ok(())
    }
}

fn state(settings: Settings) -> AppState {
    AppState::new(settings, Arc::new(OfflineBackend), Arc::new(StaticAnalytics))
}

fn app() -> Router {
    create_router(state(Settings::default()))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

async fn new_session(app: &Router) -> String {
    let (status, body) = call(app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = call(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_with_fallback() {
    let (status, body) = call(&app(), Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["llm"]["reachable"], false);
}

#[tokio::test]
async fn test_not_ready_without_fallback() {
    let mut settings = Settings::default();
    settings.assistant.fallback_enabled = false;
    let app = create_router(state(settings));
    let (status, _) = call(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_ready_probe_is_bounded() {
    let mut settings = Settings::default();
    settings.llm.timeout_secs = Some(1);
    settings.assistant.fallback_enabled = false;
    let app = create_router(AppState::new(settings, Arc::new(HangingBackend), Arc::new(StaticAnalytics)));

    let started = Instant::now();
    let (status, body) = call(&app, Method::GET, "/ready", None).await;
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["llm"]["reachable"], false);
}

#[tokio::test]
async fn test_dashboard_carries_summary() {
    let (status, body) = call(&app(), Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["footfallData"][0]["siruseri"], 40);
    assert_eq!(body["footfall_summary"]["total_visitors"], 100);
    assert_eq!(body["footfall_summary"]["peak"], 100);
    assert_eq!(body["radar"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_new_session_starts_with_welcome() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], "bot");
    assert!(messages[0]["blocks"].is_array());
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_message_round_trip() {
    let app = app();
    let id = new_session(&app).await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/messages", id),
        Some(json!({ "text": "What is the total footfall?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"]["kind"], "fallback");
    assert_eq!(body["source"]["intent"], "footfall");
    assert!(body["bot"]["text"].as_str().unwrap().contains("**100 visitors**"));
    assert!(body["user"].get("blocks").is_none());
    assert_eq!(body["bot"]["blocks"][0]["type"], "heading");

    let (_, transcript) = call(&app, Method::GET, &format!("/api/sessions/{}/messages", id), None).await;
    assert_eq!(transcript["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_blank_message_is_bad_request() {
    let app = app();
    let id = new_session(&app).await;
    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/messages", id),
        Some(json!({ "text": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = app();
    let (status, _) = call(&app, Method::GET, "/api/sessions/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/sessions/missing/messages",
        Some(json!({ "text": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reset_and_delete() {
    let app = app();
    let id = new_session(&app).await;
    call(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/messages", id),
        Some(json!({ "text": "help" })),
    )
    .await;

    let (status, body) = call(&app, Method::POST, &format!("/api/sessions/{}/reset", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = call(&app, Method::GET, "/api/sessions", None).await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_context_persists_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let repository = JsonFileSessionRepository::new(dir.path()).unwrap();
    let app = create_router(state(Settings::default()).with_contexts(Arc::new(repository)));
    let id = new_session(&app).await;

    let (status, body) = call(&app, Method::GET, &format!("/api/sessions/{}/context", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dark_mode"], false);

    let context = json!({
        "current_user": { "username": "jdoe", "display_name": "Jane Doe", "role": "manager" },
        "dark_mode": true,
    });
    let (status, _) = call(&app, Method::PUT, &format!("/api/sessions/{}/context", id), Some(context)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(dir.path().join(format!("{}.json", id)).exists());

    let (_, body) = call(&app, Method::GET, &format!("/api/sessions/{}/context", id), None).await;
    assert_eq!(body["dark_mode"], true);
    assert_eq!(body["current_user"]["role"], "manager");
}

#[tokio::test]
async fn test_render_endpoint() {
    let (status, body) = call(
        &app(),
        Method::POST,
        "/api/render",
        Some(json!({ "text": "## Revenue\n\n- **New York**: $2.3M" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blocks"][0]["type"], "heading");
    assert_eq!(body["blocks"][1]["type"], "bullet_list");
    assert!(body["html"].as_str().unwrap().starts_with("<h2>Revenue</h2>"));
    assert_eq!(body["plain"], "Revenue\n\n- New York: $2.3M");
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let (status, _) = call(&app(), Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
