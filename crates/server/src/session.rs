//! Session management
//!
//! Live chat sessions keyed by id. Transcripts live only in memory; the
//! per-session context goes through the repository held by `AppState`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use branch_assistant_agent::{Assistant, ChatSession, SessionState};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::watch;

use crate::ServerError;

/// Listing entry for a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
    pub state: SessionState,
}

impl SessionSummary {
    pub fn of(session: &ChatSession) -> Self {
        Self {
            id: session.id().to_string(),
            created_at: session.created_at(),
            message_count: session.message_count(),
            state: session.state(),
        }
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<ChatSession>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    /// Manager with a one hour idle timeout swept every five minutes
    pub fn new(max_sessions: usize) -> Self {
        Self::with_config(max_sessions, Duration::from_secs(3600), Duration::from_secs(300))
    }

    pub fn with_config(max_sessions: usize, session_timeout: Duration, cleanup_interval: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout,
            cleanup_interval,
        }
    }

    /// Periodically drop expired sessions until the returned sender sends `true`
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);

        tokio::spawn(async move {
            let mut timer = tokio::time::interval(manager.cleanup_interval);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        let removed = manager.cleanup_expired();
                        if removed > 0 {
                            tracing::info!(removed, remaining = manager.count(), "Expired idle sessions");
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a session with a fresh welcome transcript
    pub fn create(&self, assistant: Arc<Assistant>) -> Result<Arc<ChatSession>, ServerError> {
        let mut sessions = self.sessions.write();
        if sessions.len() >= self.max_sessions {
            self.cleanup_expired_internal(&mut sessions);
            if sessions.len() >= self.max_sessions {
                tracing::warn!(max = self.max_sessions, "Session limit reached");
                return Err(ServerError::Capacity(self.max_sessions));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(ChatSession::new(id.clone(), assistant));
        sessions.insert(id.clone(), session.clone());

        metrics::gauge!("chat_sessions_active").set(sessions.len() as f64);
        tracing::info!(session_id = %id, "Created session");
        Ok(session)
    }

    pub fn get(&self, id: &str) -> Option<Arc<ChatSession>> {
        self.sessions.read().get(id).cloned()
    }

    /// Session by id or a not-found error; counts as activity
    pub fn require(&self, id: &str) -> Result<Arc<ChatSession>, ServerError> {
        let session = self.get(id).ok_or_else(|| ServerError::SessionNotFound(id.to_string()))?;
        session.touch();
        Ok(session)
    }

    pub fn remove(&self, id: &str) -> Option<Arc<ChatSession>> {
        let mut sessions = self.sessions.write();
        let removed = sessions.remove(id);
        if removed.is_some() {
            metrics::gauge!("chat_sessions_active").set(sessions.len() as f64);
            tracing::info!(session_id = %id, "Removed session");
        }
        removed
    }

    /// Summaries, oldest first
    pub fn list(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .read()
            .values()
            .map(|s| SessionSummary::of(s))
            .collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        summaries
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Drop idle sessions; returns how many went
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions)
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<ChatSession>>) -> usize {
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(self.session_timeout))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            sessions.remove(id);
            tracing::info!(session_id = %id, "Expired session");
        }
        if !expired.is_empty() {
            metrics::gauge!("chat_sessions_active").set(sessions.len() as f64);
        }
        expired.len()
    }
}
