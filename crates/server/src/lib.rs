//! Branch Assistant Server
//!
//! HTTP API over chat sessions: session lifecycle, messages with rendered
//! markup, per-session context, health and Prometheus metrics.

pub mod http;
pub mod session;
pub mod state;

pub use http::create_router;
pub use session::{SessionManager, SessionSummary};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session limit of {0} reached")]
    Capacity(usize),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        err.status()
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Capacity(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Storage(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<branch_assistant_agent::AgentError> for ServerError {
    fn from(err: branch_assistant_agent::AgentError) -> Self {
        use branch_assistant_agent::AgentError;
        match err {
            AgentError::EmptyMessage => ServerError::InvalidRequest(AgentError::EmptyMessage.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<branch_assistant_core::Error> for ServerError {
    fn from(err: branch_assistant_core::Error) -> Self {
        ServerError::Storage(err.to_string())
    }
}
