//! Branch analytics assistant
//!
//! Features:
//! - Keyword intent matching over an ordered rule table
//! - Templated response synthesis from live dashboard snapshots
//! - Primary language-model answers with local fallback
//! - Chat sessions with an append-only transcript and event stream

pub mod assistant;
pub mod intent;
pub mod session;
pub mod synthesizer;

pub use assistant::{Assistant, AssistantReply, ReplySource, LOADING_NOTICE};
pub use intent::{IntentMatcher, IntentRule};
pub use session::{ChatSession, ChatTurn, SessionEvent, SessionState, APOLOGY};
pub use synthesizer::{ResponseSynthesizer, SynthesisError, LIVE_DATA_NOTICE};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("LLM error: {0}")]
    Llm(String),
}

impl From<branch_assistant_llm::LlmError> for AgentError {
    fn from(err: branch_assistant_llm::LlmError) -> Self {
        AgentError::Llm(err.to_string())
    }
}
