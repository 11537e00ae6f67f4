//! Assistant: primary language-model answers with local fallback
//!
//! The primary path asks the chat backend. When its data context is not yet
//! loaded the assistant triggers a refresh and replies with a loading notice.
//! When the primary path fails the assistant classifies the message, fetches
//! a dashboard snapshot and synthesizes a reply locally.

use std::sync::Arc;

use branch_assistant_analytics::{fetch_snapshot, AnalyticsSource, DateRange};
use branch_assistant_config::Settings;
use branch_assistant_core::{BranchDirectory, Intent};
use branch_assistant_llm::{ChatBackend, LlmError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::intent::IntentMatcher;
use crate::synthesizer::ResponseSynthesizer;
use crate::AgentError;

/// Reply while the chat backend is still loading its data context
pub const LOADING_NOTICE: &str = "🔄 **Loading latest banking data...** Please ask your question again in a moment for data-driven insights!";

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "intent", rename_all = "snake_case")]
pub enum ReplySource {
    /// Language-model backend
    Primary,
    /// Backend data context was loading
    ContextLoading,
    /// Local synthesis for the classified intent
    Fallback(Intent),
    /// Nothing could answer
    Apology,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::Primary => "primary",
            ReplySource::ContextLoading => "context_loading",
            ReplySource::Fallback(_) => "fallback",
            ReplySource::Apology => "apology",
        }
    }
}

/// Reply text and its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    pub source: ReplySource,
}

/// Answers one chat message at a time. Stateless between calls.
pub struct Assistant {
    llm: Arc<dyn ChatBackend>,
    analytics: Arc<dyn AnalyticsSource>,
    matcher: IntentMatcher,
    synthesizer: ResponseSynthesizer,
    directory: BranchDirectory,
    lookback_days: u32,
    fallback_enabled: bool,
    forecast_seed: Option<u64>,
    welcome_message: String,
}

impl Assistant {
    pub fn new(settings: &Settings, llm: Arc<dyn ChatBackend>, analytics: Arc<dyn AnalyticsSource>) -> Self {
        Self {
            llm,
            analytics,
            matcher: IntentMatcher::default(),
            synthesizer: ResponseSynthesizer::new(settings),
            directory: settings.branch_directory(),
            lookback_days: settings.analytics.lookback_days,
            fallback_enabled: settings.assistant.fallback_enabled,
            forecast_seed: settings.assistant.forecast_seed,
            welcome_message: settings.assistant.welcome_message.clone(),
        }
    }

    pub fn welcome_message(&self) -> &str {
        &self.welcome_message
    }

    pub fn matcher(&self) -> &IntentMatcher {
        &self.matcher
    }

    pub fn synthesizer(&self) -> &ResponseSynthesizer {
        &self.synthesizer
    }

    /// Answer a message
    pub async fn respond(&self, input: &str) -> Result<AssistantReply, AgentError> {
        match self.ask_primary(input).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    endpoint = %self.llm.endpoint(),
                    fallback = self.fallback_enabled,
                    "Chat backend unavailable"
                );
                if !self.fallback_enabled {
                    return Err(e.into());
                }
                metrics::counter!("assistant_fallback_total").increment(1);
                Ok(self.fallback(input).await)
            }
        }
    }

    async fn ask_primary(&self, input: &str) -> Result<AssistantReply, LlmError> {
        let health = self.llm.health().await?;
        tracing::debug!(status = %health.status, context_loaded = health.context_loaded, "Chat backend health");

        if !health.context_loaded {
            if let Err(e) = self.analytics.refresh_data_context().await {
                tracing::warn!(error = %e, "Data context refresh failed");
            }
            return Ok(AssistantReply {
                text: LOADING_NOTICE.to_string(),
                source: ReplySource::ContextLoading,
            });
        }

        let text = self.llm.chat(input).await?;
        Ok(AssistantReply {
            text: self.directory.swap_names_in_text(&text),
            source: ReplySource::Primary,
        })
    }

    /// Answer locally from a fresh snapshot
    pub async fn fallback(&self, input: &str) -> AssistantReply {
        let intent = self.matcher.classify(input);
        let snapshot = if intent.uses_live_data() {
            let range = DateRange::trailing_days_from_today(self.lookback_days);
            Some(fetch_snapshot(self.analytics.as_ref(), &range).await)
        } else {
            None
        };

        let mut rng = match self.forecast_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let text = self.synthesizer.synthesize(intent, snapshot.as_ref(), &mut rng);
        tracing::info!(intent = %intent, chars = text.len(), "Synthesized fallback reply");

        AssistantReply {
            text,
            source: ReplySource::Fallback(intent),
        }
    }
}
