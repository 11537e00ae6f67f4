//! Session context and its repository
//!
//! Per-session client state (the mocked current user and the dark-mode
//! flag) is an explicit value read and written through [`SessionRepository`].
//! The in-memory store is the default; the JSON file store keeps contexts
//! across restarts.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Role of the dashboard user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    Analyst,
}

/// The signed-in dashboard user (login is mocked)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Client-side state attached to a chat session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default)]
    pub current_user: Option<CurrentUser>,
    #[serde(default)]
    pub dark_mode: bool,
}

/// Storage for session contexts keyed by session id
pub trait SessionRepository: Send + Sync {
    /// Load a context; a session with nothing stored yields the default
    fn load(&self, session_id: &str) -> Result<SessionContext>;

    /// Store a context, replacing any previous one
    fn save(&self, session_id: &str, context: &SessionContext) -> Result<()>;

    /// Forget a session's context
    fn clear(&self, session_id: &str) -> Result<()>;
}

/// In-memory repository
#[derive(Default)]
pub struct InMemorySessionRepository {
    contexts: RwLock<HashMap<String, SessionContext>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contexts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.read().is_empty()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn load(&self, session_id: &str) -> Result<SessionContext> {
        Ok(self.contexts.read().get(session_id).cloned().unwrap_or_default())
    }

    fn save(&self, session_id: &str, context: &SessionContext) -> Result<()> {
        self.contexts.write().insert(session_id.to_string(), context.clone());
        Ok(())
    }

    fn clear(&self, session_id: &str) -> Result<()> {
        self.contexts.write().remove(session_id);
        Ok(())
    }
}

/// One JSON file per session under a directory
pub struct JsonFileSessionRepository {
    dir: PathBuf,
}

impl JsonFileSessionRepository {
    /// Use `dir`, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, session_id: &str) -> Result<PathBuf> {
        let valid = !session_id.is_empty()
            && session_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::Session(format!("invalid session id: {:?}", session_id)));
        }
        Ok(self.dir.join(format!("{}.json", session_id)))
    }
}

impl SessionRepository for JsonFileSessionRepository {
    fn load(&self, session_id: &str) -> Result<SessionContext> {
        let path = self.path_for(session_id)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionContext::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session_id: &str, context: &SessionContext) -> Result<()> {
        let path = self.path_for(session_id)?;
        let contents = serde_json::to_string_pretty(context)?;
        std::fs::write(&path, contents)?;
        tracing::debug!(session_id, path = %path.display(), "Saved session context");
        Ok(())
    }

    fn clear(&self, session_id: &str) -> Result<()> {
        let path = self.path_for(session_id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyst() -> SessionContext {
        SessionContext {
            current_user: Some(CurrentUser {
                username: "jdoe".to_string(),
                display_name: "Jane Doe".to_string(),
                role: UserRole::Analyst,
            }),
            dark_mode: true,
        }
    }

    #[test]
    fn test_in_memory_round_trip() {
        let repo = InMemorySessionRepository::new();
        assert_eq!(repo.load("s1").unwrap(), SessionContext::default());

        repo.save("s1", &analyst()).unwrap();
        assert_eq!(repo.load("s1").unwrap(), analyst());
        assert_eq!(repo.len(), 1);

        repo.clear("s1").unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn test_json_file_repository() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileSessionRepository::new(dir.path()).unwrap();

        repo.save("abc-123", &analyst()).unwrap();
        let reopened = JsonFileSessionRepository::new(dir.path()).unwrap();
        assert_eq!(reopened.load("abc-123").unwrap(), analyst());

        reopened.clear("abc-123").unwrap();
        assert_eq!(reopened.load("abc-123").unwrap(), SessionContext::default());
        // Clearing twice is fine
        reopened.clear("abc-123").unwrap();
    }

    #[test]
    fn test_json_file_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileSessionRepository::new(dir.path()).unwrap();
        assert!(repo.save("../escape", &analyst()).is_err());
        assert!(repo.load("").is_err());
    }
}
