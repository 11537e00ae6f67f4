//! Main settings module

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use branch_assistant_core::{BranchDirectory, BranchProfile};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{AnalyticsConfig, AssistantConfig, BaselineConfig, ChatBackendConfig, ConfigError};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    /// Analytics REST backend
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Language-model chat service
    #[serde(default)]
    pub llm: ChatBackendConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Placeholder figures
    #[serde(default)]
    pub baselines: BaselineConfig,

    /// Branch network, in display order
    #[serde(default = "BranchDirectory::default_profiles")]
    pub branches: Vec<BranchProfile>,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: RuntimeEnvironment::default(),
            server: ServerConfig::default(),
            analytics: AnalyticsConfig::default(),
            llm: ChatBackendConfig::default(),
            assistant: AssistantConfig::default(),
            baselines: BaselineConfig::default(),
            branches: BranchDirectory::default_profiles(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a TOML document (unset keys take defaults)
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a YAML document (unset keys take defaults)
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_yaml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Branch directory built from the configured profiles
    pub fn branch_directory(&self) -> BranchDirectory {
        BranchDirectory::new(self.branches.clone())
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_backends()?;
        self.validate_assistant()?;
        self.validate_baselines()?;
        self.validate_branches()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "Port cannot be 0"));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::invalid("server.host", "Host cannot be empty"));
        }
        if self.server.max_sessions == 0 {
            return Err(ConfigError::invalid("server.max_sessions", "Must allow at least 1 session"));
        }
        if self.server.session_timeout_secs == 0 {
            return Err(ConfigError::invalid("server.session_timeout_secs", "Timeout cannot be 0"));
        }
        if self.server.cleanup_interval_secs == 0 {
            return Err(ConfigError::invalid("server.cleanup_interval_secs", "Interval cannot be 0"));
        }
        if self.environment.is_production()
            && self.server.cors_enabled
            && self.server.cors_origins.iter().any(|o| o == "*")
        {
            return Err(ConfigError::invalid(
                "server.cors_origins",
                "Wildcard origin is not allowed in production",
            ));
        }
        Ok(())
    }

    fn validate_backends(&self) -> Result<(), ConfigError> {
        if self.analytics.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("analytics.base_url", "Endpoint cannot be empty"));
        }
        if self.analytics.lookback_days == 0 {
            return Err(ConfigError::invalid("analytics.lookback_days", "Must be at least 1 day"));
        }
        if self.llm.endpoint.trim().is_empty() {
            return Err(ConfigError::invalid("llm.endpoint", "Endpoint cannot be empty"));
        }
        if self.llm.chat_path.trim().is_empty() {
            return Err(ConfigError::invalid("llm.chat_path", "Path cannot be empty"));
        }
        if matches!(self.analytics.timeout_secs, Some(0)) {
            return Err(ConfigError::invalid("analytics.timeout_secs", "Timeout cannot be 0"));
        }
        if matches!(self.llm.timeout_secs, Some(0)) {
            return Err(ConfigError::invalid("llm.timeout_secs", "Timeout cannot be 0"));
        }
        Ok(())
    }

    fn validate_assistant(&self) -> Result<(), ConfigError> {
        if self.assistant.trend_window < 2 {
            return Err(ConfigError::invalid(
                "assistant.trend_window",
                format!("Must be at least 2, got {}", self.assistant.trend_window),
            ));
        }
        if self.assistant.forecast_days == 0 {
            return Err(ConfigError::invalid("assistant.forecast_days", "Must be at least 1"));
        }
        if self.assistant.welcome_message.trim().is_empty() {
            return Err(ConfigError::invalid("assistant.welcome_message", "Cannot be empty"));
        }
        Ok(())
    }

    fn validate_baselines(&self) -> Result<(), ConfigError> {
        let baselines = &self.baselines;
        if !(0.0..1.0).contains(&baselines.forecast_jitter) {
            return Err(ConfigError::invalid(
                "baselines.forecast_jitter",
                format!("Must be in [0.0, 1.0), got {}", baselines.forecast_jitter),
            ));
        }
        if !(baselines.forecast_base_daily.is_finite() && baselines.forecast_base_daily > 0.0) {
            return Err(ConfigError::invalid("baselines.forecast_base_daily", "Must be positive"));
        }
        if !(0.0..=5.0).contains(&baselines.satisfaction_baseline) {
            return Err(ConfigError::invalid(
                "baselines.satisfaction_baseline",
                format!("Must be between 0.0 and 5.0, got {}", baselines.satisfaction_baseline),
            ));
        }
        if baselines.default_split.is_empty()
            || baselines.default_split.iter().any(|s| !s.is_finite() || *s < 0.0)
            || baselines.default_split.iter().sum::<f64>() <= 0.0
        {
            return Err(ConfigError::invalid(
                "baselines.default_split",
                "Needs at least one non-negative share with a positive sum",
            ));
        }
        Ok(())
    }

    fn validate_branches(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for profile in &self.branches {
            if profile.key.trim().is_empty() || profile.display_name.trim().is_empty() {
                return Err(ConfigError::invalid("branches", "Branch key and display name are required"));
            }
            if !seen.insert(profile.key.to_ascii_lowercase()) {
                return Err(ConfigError::invalid(
                    "branches",
                    format!("Duplicate branch key: {}", profile.key),
                ));
            }
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed origins; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Directory for persisted session contexts; unset keeps them in memory
    #[serde(default)]
    pub session_store_dir: Option<PathBuf>,

    /// Live chat sessions kept before new ones are refused
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle seconds before a session is dropped
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,

    /// Seconds between expiry sweeps
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8090
}
fn default_true() -> bool {
    true
}
fn default_max_sessions() -> usize {
    100
}
fn default_session_timeout_secs() -> u64 {
    3600
}
fn default_cleanup_interval_secs() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
            session_store_dir: None,
            max_sessions: default_max_sessions(),
            session_timeout_secs: default_session_timeout_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

/// Logging and metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Serve Prometheus metrics at `/metrics`
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from `config/` and the environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (`BRANCH_ASSISTANT__` prefix)
/// 2. config/{env}.toml|yaml (if env specified)
/// 3. config/default.toml|yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Same as [`load_settings`] with an explicit config directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("BRANCH_ASSISTANT")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;
    tracing::debug!(dir = %dir.display(), env = ?env, "Loaded settings");

    Ok(settings)
}
