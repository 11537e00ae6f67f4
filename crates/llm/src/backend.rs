//! Chat backend implementations

use async_trait::async_trait;
use branch_assistant_config::ChatBackendConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::LlmError;

/// Health report of the chat service
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BackendHealth {
    #[serde(default)]
    pub status: String,
    /// Whether the service has banking data loaded into its context
    #[serde(default)]
    pub context_loaded: bool,
}

/// Primary answering service
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Probe the service
    async fn health(&self) -> Result<BackendHealth, LlmError>;

    /// Ask a question and get the reply text.
    ///
    /// A reply with no usable text is an error.
    async fn chat(&self, message: &str) -> Result<String, LlmError>;

    /// Service root, for logging
    fn endpoint(&self) -> &str;
}

/// HTTP chat backend
#[derive(Clone)]
pub struct HttpChatBackend {
    client: Client,
    config: ChatBackendConfig,
}

impl HttpChatBackend {
    pub fn new(config: ChatBackendConfig) -> Result<Self, LlmError> {
        if config.endpoint.trim().is_empty() {
            return Err(LlmError::Configuration("endpoint is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(LlmError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    response: Option<String>,
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn health(&self) -> Result<BackendHealth, LlmError> {
        let response = self.client.get(self.config.health_url()).send().await?;
        let response = Self::check_status(response).await?;
        let health: BackendHealth = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            status = %health.status,
            context_loaded = health.context_loaded,
            "Chat service health"
        );
        Ok(health)
    }

    async fn chat(&self, message: &str) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.config.chat_url())
            .json(&ChatRequest { message })
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        match body.response {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(LlmError::InvalidResponse("missing response text".to_string())),
        }
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}
