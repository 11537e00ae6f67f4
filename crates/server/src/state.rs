//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use branch_assistant_agent::Assistant;
use branch_assistant_analytics::{AnalyticsSource, HttpAnalyticsClient};
use branch_assistant_config::Settings;
use branch_assistant_core::{InMemorySessionRepository, JsonFileSessionRepository, SessionRepository};
use branch_assistant_llm::{ChatBackend, HttpChatBackend};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::session::SessionManager;
use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub sessions: Arc<SessionManager>,
    pub assistant: Arc<Assistant>,
    /// Chat backend, also probed by `/ready`
    pub llm: Arc<dyn ChatBackend>,
    /// Analytics backend behind `/api/dashboard`
    pub analytics: Arc<dyn AnalyticsSource>,
    /// Per-session context store
    pub contexts: Arc<dyn SessionRepository>,
    /// Prometheus recorder handle; `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State over the given backends with in-memory session contexts
    pub fn new(settings: Settings, llm: Arc<dyn ChatBackend>, analytics: Arc<dyn AnalyticsSource>) -> Self {
        let assistant = Arc::new(Assistant::new(&settings, llm.clone(), analytics.clone()));
        Self {
            sessions: Arc::new(SessionManager::with_config(
                settings.server.max_sessions,
                settings.server.session_timeout(),
                settings.server.cleanup_interval(),
            )),
            settings: Arc::new(settings),
            assistant,
            llm,
            analytics,
            contexts: Arc::new(InMemorySessionRepository::new()),
            metrics: None,
        }
    }

    /// State over the HTTP backends named in `settings`
    pub fn from_settings(settings: Settings) -> Result<Self, ServerError> {
        let llm = HttpChatBackend::new(settings.llm.clone()).map_err(|e| ServerError::Internal(e.to_string()))?;
        let analytics = HttpAnalyticsClient::new(&settings.analytics, settings.branch_directory())
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        let contexts: Arc<dyn SessionRepository> = match &settings.server.session_store_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "Persisting session contexts to disk");
                Arc::new(JsonFileSessionRepository::new(dir.clone())?)
            }
            None => Arc::new(InMemorySessionRepository::new()),
        };

        Ok(Self::new(settings, Arc::new(llm), Arc::new(analytics)).with_contexts(contexts))
    }

    pub fn with_contexts(mut self, contexts: Arc<dyn SessionRepository>) -> Self {
        self.contexts = contexts;
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
