//! External service endpoints

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Analytics REST backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Base URL, e.g. `http://localhost:8080/api`
    #[serde(default = "default_analytics_url")]
    pub base_url: String,

    /// Trailing days requested for footfall and branch comparison
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Request timeout; unset leaves the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_analytics_url() -> String {
    "http://localhost:8080/api".to_string()
}
fn default_lookback_days() -> u32 {
    7
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            base_url: default_analytics_url(),
            lookback_days: default_lookback_days(),
            timeout_secs: None,
        }
    }
}

impl AnalyticsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Language-model chat service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBackendConfig {
    /// Service root, e.g. `http://localhost:8000`
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Request timeout; unset leaves the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_llm_endpoint() -> String {
    "http://localhost:8000".to_string()
}
fn default_chat_path() -> String {
    "/chat".to_string()
}
fn default_health_path() -> String {
    "/health".to_string()
}

impl Default for ChatBackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            chat_path: default_chat_path(),
            health_path: default_health_path(),
            timeout_secs: None,
        }
    }
}

impl ChatBackendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn chat_url(&self) -> String {
        join_url(&self.endpoint, &self.chat_path)
    }

    pub fn health_url(&self) -> String {
        join_url(&self.endpoint, &self.health_path)
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
