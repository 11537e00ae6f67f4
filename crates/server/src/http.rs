//! HTTP Endpoints
//!
//! REST API for chat sessions.

use std::time::Duration;

use axum::{
    extract::{Json, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use branch_assistant_agent::ReplySource;
use branch_assistant_analytics::{
    fetch_snapshot, footfall_summary, radar_scores, DateRange, FootfallSummary, RadarScores,
};
use branch_assistant_core::{ChatMessage, DashboardSnapshot, SessionContext};
use branch_assistant_text_processing::{render, to_html, to_plain, Block};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::session::SessionSummary;
use crate::state::AppState;
use crate::ServerError;

/// Upper bound on the chat backend probe behind `/ready`
const READY_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.settings.server.cors_origins, state.settings.server.cors_enabled);

    Router::new()
        // Sessions
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/messages", get(list_messages).post(send_message))
        .route("/api/sessions/:id/reset", post(reset_session))
        .route("/api/sessions/:id/context", get(get_context).put(put_context))

        // Chat helpers
        .route("/api/suggestions", get(suggestions))
        .route("/api/render", post(render_markup))
        .route("/api/dashboard", get(dashboard))

        // Health and metrics
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))

        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// CORS from configured origins; an empty list allows any origin
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        return CorsLayer::new();
    }

    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS];
    if origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(methods).allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Invalid CORS origin");
                None
            })
        })
        .collect();

    tracing::info!("CORS configured with {} origins", parsed.len());
    CorsLayer::new().allow_origin(parsed).allow_methods(methods).allow_headers(Any)
}

/// A transcript entry; bot messages carry their parsed markup
#[derive(Debug, Serialize)]
struct MessageView {
    #[serde(flatten)]
    message: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocks: Option<Vec<Block>>,
}

impl From<ChatMessage> for MessageView {
    fn from(message: ChatMessage) -> Self {
        let blocks = message.is_bot().then(|| render(&message.text));
        Self { message, blocks }
    }
}

fn views(messages: Vec<ChatMessage>) -> Vec<MessageView> {
    messages.into_iter().map(MessageView::from).collect()
}

/// Create a session
async fn create_session(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
    let session = state.sessions.create(state.assistant.clone())?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session_id": session.id(),
            "messages": views(session.messages()),
            "suggestions": state.settings.assistant.suggestions,
        })),
    ))
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "count": sessions.len(),
        "sessions": sessions,
    }))
}

/// Get session info
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>, ServerError> {
    let session = state.sessions.require(&id)?;
    Ok(Json(SessionSummary::of(&session)))
}

/// Delete session and its stored context
async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state
        .sessions
        .remove(&id)
        .ok_or_else(|| ServerError::SessionNotFound(id.clone()))?;
    if let Err(e) = state.contexts.clear(&id) {
        tracing::warn!(session_id = %id, error = %e, "Failed to clear session context");
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let session = state.sessions.require(&id)?;
    Ok(Json(serde_json::json!({ "messages": views(session.messages()) })))
}

/// Message request
#[derive(Debug, Deserialize)]
struct SendRequest {
    text: String,
}

/// Message response
#[derive(Debug, Serialize)]
struct SendResponse {
    user: MessageView,
    bot: MessageView,
    source: ReplySource,
}

/// Send a chat message and wait for the reply
async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SendRequest>,
) -> Result<Json<SendResponse>, ServerError> {
    let session = state.sessions.require(&id)?;
    let turn = session.send(&request.text).await?;
    Ok(Json(SendResponse {
        user: turn.user.into(),
        bot: turn.bot.into(),
        source: turn.source,
    }))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let session = state.sessions.require(&id)?;
    session.reset();
    Ok(Json(serde_json::json!({ "messages": views(session.messages()) })))
}

async fn get_context(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionContext>, ServerError> {
    state.sessions.require(&id)?;
    Ok(Json(state.contexts.load(&id)?))
}

async fn put_context(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(context): Json<SessionContext>,
) -> Result<Json<SessionContext>, ServerError> {
    state.sessions.require(&id)?;
    state.contexts.save(&id, &context)?;
    Ok(Json(context))
}

/// Quick suggestions shown before the first message
async fn suggestions(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "suggestions": state.settings.assistant.suggestions }))
}

#[derive(Debug, Deserialize)]
struct RenderRequest {
    text: String,
}

/// Parse markup into blocks, HTML and plain text
async fn render_markup(Json(request): Json<RenderRequest>) -> Json<serde_json::Value> {
    let blocks = render(&request.text);
    Json(serde_json::json!({
        "html": to_html(&blocks),
        "plain": to_plain(&blocks),
        "blocks": blocks,
    }))
}

/// Per-branch chart scores
#[derive(Debug, Serialize)]
struct BranchRadar {
    branch: String,
    scores: RadarScores,
}

/// Snapshot plus the figures the dashboard charts draw
#[derive(Debug, Serialize)]
struct DashboardView {
    snapshot: DashboardSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    footfall_summary: Option<FootfallSummary>,
    radar: Vec<BranchRadar>,
}

/// Fresh dashboard snapshot over the configured lookback window
async fn dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let range = DateRange::trailing_days_from_today(state.settings.analytics.lookback_days);
    let snapshot = fetch_snapshot(state.analytics.as_ref(), &range).await;

    let footfall_summary = snapshot.footfall_series().map(footfall_summary);
    let radar = snapshot
        .branches()
        .unwrap_or_default()
        .iter()
        .map(|branch| BranchRadar {
            branch: branch.branch_name.clone(),
            scores: radar_scores(branch),
        })
        .collect();

    Json(DashboardView {
        snapshot,
        footfall_summary,
        radar,
    })
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check.
///
/// Not ready only when the chat backend is unreachable and there is no
/// local fallback to answer instead.
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let fallback_enabled = state.settings.assistant.fallback_enabled;
    let limit = state
        .settings
        .llm
        .timeout()
        .map_or(READY_PROBE_TIMEOUT, |t| t.min(READY_PROBE_TIMEOUT));
    let (reachable, context_loaded) = match tokio::time::timeout(limit, state.llm.health()).await {
        Ok(Ok(h)) => (true, h.context_loaded),
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "Chat backend probe failed");
            (false, false)
        }
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Chat backend probe timed out");
            (false, false)
        }
    };
    let ready = reachable || fallback_enabled;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "unavailable" },
            "sessions": state.sessions.count(),
            "llm": {
                "endpoint": state.llm.endpoint(),
                "reachable": reachable,
                "context_loaded": context_loaded,
            },
            "fallback_enabled": fallback_enabled,
        })),
    )
}

/// Prometheus metrics
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "metrics disabled".to_string(),
        ),
    }
}
