//! End-to-end chat flow with scripted backends

use std::sync::Arc;

use async_trait::async_trait;
use branch_assistant_agent::{
    AgentError, Assistant, ChatSession, ReplySource, SessionState, APOLOGY, LOADING_NOTICE,
};
use branch_assistant_analytics::{AnalyticsError, AnalyticsSource, DateRange};
use branch_assistant_config::Settings;
use branch_assistant_core::{BranchComparison, FootfallDay, Intent, RealTimeStats, Sender};
use branch_assistant_llm::{BackendHealth, ChatBackend, LlmError};
use regex::Regex;

/// Chat backend whose chat call always fails; health depends on the flags
struct FailingBackend {
    reachable: bool,
    context_loaded: bool,
}

#[async_trait]
impl ChatBackend for FailingBackend {
    async fn health(&self) -> Result<BackendHealth, LlmError> {
        if !self.reachable {
            return Err(LlmError::Network("connection refused".into()));
        }
        Ok(BackendHealth {
            status: "ok".into(),
            context_loaded: self.context_loaded,
        })
    }

    async fn chat(&self, _message: &str) -> Result<String, LlmError> {
        Err(LlmError::InvalidResponse("missing response".into()))
    }

    fn endpoint(&self) -> &str {
        "http://llm.test"
    }
}

/// Seven days of 40/35/25 visitors
struct WeekOfFootfall;

#[async_trait]
impl AnalyticsSource for WeekOfFootfall {
    async fn footfall_trends(&self, _range: &DateRange) -> Result<Vec<FootfallDay>, AnalyticsError> {
        Ok((1..=7)
            .map(|d| {
                FootfallDay::new(
                    format!("2025-01-0{}", d),
                    [("siruseri", 40), ("tnagar", 35), ("navalur", 25)],
                )
            })
            .collect())
    }

    async fn branch_comparison(&self, _range: &DateRange) -> Result<Vec<BranchComparison>, AnalyticsError> {
        Err(AnalyticsError::Status {
            status: 500,
            url: "http://analytics.test/branch-comparison".into(),
        })
    }

    async fn real_time_stats(&self) -> Result<RealTimeStats, AnalyticsError> {
        Err(AnalyticsError::Network("connection refused".into()))
    }

    async fn refresh_data_context(&self) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::Network("connection refused".into()))
    }
}

fn session_with(settings: &Settings, backend: FailingBackend) -> ChatSession {
    let assistant = Assistant::new(settings, Arc::new(backend), Arc::new(WeekOfFootfall));
    ChatSession::new("flow", Arc::new(assistant))
}

fn offline_session() -> ChatSession {
    session_with(
        &Settings::default(),
        FailingBackend {
            reachable: false,
            context_loaded: false,
        },
    )
}

#[tokio::test]
async fn test_footfall_question_uses_live_data() {
    let session = offline_session();
    let turn = session
        .send("What is the total footfall for the past 7 days?")
        .await
        .unwrap();

    assert_eq!(turn.source, ReplySource::Fallback(Intent::Footfall));
    assert!(turn.bot.text.contains("700"));

    let shares = Regex::new(r"\((\d+)%\)").unwrap();
    let sum: u32 = shares
        .captures_iter(&turn.bot.text)
        .map(|c| c[1].parse::<u32>().unwrap())
        .sum();
    assert!((99..=101).contains(&sum), "shares summed to {}", sum);
}

#[tokio::test]
async fn test_transcript_grows_by_two_per_turn() {
    let session = offline_session();
    let questions = ["show revenue", "compare branches", "help", "forecast next week"];
    for question in questions {
        session.send(question).await.unwrap();
    }

    let messages = session.messages();
    assert_eq!(messages.len(), 2 * questions.len() + 1);
    assert!(messages.windows(2).all(|pair| pair[0].id < pair[1].id));
    for (i, message) in messages.iter().enumerate() {
        let expected = if i % 2 == 0 { Sender::Bot } else { Sender::User };
        assert_eq!(message.sender, expected);
    }
    assert_eq!(session.state(), SessionState::AwaitingInput);
}

#[tokio::test]
async fn test_loading_context_notice() {
    let session = session_with(
        &Settings::default(),
        FailingBackend {
            reachable: true,
            context_loaded: false,
        },
    );

    let turn = session.send("How many visitors today?").await.unwrap();
    assert_eq!(turn.source, ReplySource::ContextLoading);
    assert_eq!(turn.bot.text, LOADING_NOTICE);
}

#[tokio::test]
async fn test_apology_when_fallback_disabled() {
    let mut settings = Settings::default();
    settings.assistant.fallback_enabled = false;
    let session = session_with(
        &settings,
        FailingBackend {
            reachable: true,
            context_loaded: true,
        },
    );

    let turn = session.send("revenue please").await.unwrap();
    assert_eq!(turn.source, ReplySource::Apology);
    assert_eq!(turn.bot.text, APOLOGY);
    assert_eq!(session.message_count(), 3);
}

#[tokio::test]
async fn test_empty_message_leaves_transcript_alone() {
    let session = offline_session();
    let err = session.send("").await.unwrap_err();
    assert!(matches!(err, AgentError::EmptyMessage));
    assert_eq!(session.message_count(), 1);
}

#[tokio::test]
async fn test_concurrent_sends_all_complete() {
    let session = Arc::new(offline_session());
    let handles: Vec<_> = ["footfall", "revenue", "staff"]
        .into_iter()
        .map(|q| {
            let session = session.clone();
            tokio::spawn(async move { session.send(q).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(session.message_count(), 7);
    assert_eq!(session.state(), SessionState::AwaitingInput);
}
