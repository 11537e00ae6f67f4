//! Chat session
//!
//! Owns one transcript and drives the `AwaitingInput -> AwaitingResponse ->
//! AwaitingInput` cycle for each message. Sends are not serialized: two
//! concurrent sends both append their user messages immediately and their
//! replies in completion order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use branch_assistant_core::{ChatMessage, Sender, Transcript};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::assistant::{Assistant, ReplySource};
use crate::AgentError;

/// Bot reply when no answer could be produced
pub const APOLOGY: &str = "I apologize, but I'm experiencing some technical difficulties connecting to the AI service. Please try again or contact support if the issue persists.";

/// Whether a reply is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    AwaitingInput,
    AwaitingResponse,
}

/// Session events
#[derive(Debug, Clone)]
pub enum SessionEvent {
    UserMessage(ChatMessage),
    Responding,
    BotMessage { message: ChatMessage, source: ReplySource },
    Reset,
}

/// One completed exchange
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub user: ChatMessage,
    pub bot: ChatMessage,
    pub source: ReplySource,
}

/// Clears the responding mark when a turn finishes, however it finishes
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ChatSession {
    id: String,
    assistant: Arc<Assistant>,
    transcript: Arc<Mutex<Transcript>>,
    in_flight: Arc<AtomicUsize>,
    event_tx: broadcast::Sender<SessionEvent>,
    created_at: DateTime<Utc>,
    last_activity: Arc<RwLock<Instant>>,
}

impl ChatSession {
    pub fn new(id: impl Into<String>, assistant: Arc<Assistant>) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let transcript = Transcript::new(assistant.welcome_message());
        Self {
            id: id.into(),
            assistant,
            transcript: Arc::new(Mutex::new(transcript)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            event_tx,
            created_at: Utc::now(),
            last_activity: Arc::new(RwLock::new(Instant::now())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Update last activity time
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Idle past `timeout` with no reply pending
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.state() == SessionState::AwaitingInput && self.last_activity.read().elapsed() > timeout
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub fn state(&self) -> SessionState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            SessionState::AwaitingResponse
        } else {
            SessionState::AwaitingInput
        }
    }

    /// Snapshot of the transcript
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.lock().messages().to_vec()
    }

    pub fn message_count(&self) -> usize {
        self.transcript.lock().len()
    }

    /// Send a user message and wait for the bot reply.
    ///
    /// Blank input is rejected without touching the transcript. Any other
    /// input yields exactly one user and one bot message. The reply is
    /// produced on its own task, so dropping this future does not cancel
    /// the turn.
    pub async fn send(&self, text: &str) -> Result<ChatTurn, AgentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::EmptyMessage);
        }

        self.touch();
        let user = self.transcript.lock().append(Sender::User, text);
        let _ = self.event_tx.send(SessionEvent::UserMessage(user.clone()));

        let guard = InFlight::enter(&self.in_flight);
        let _ = self.event_tx.send(SessionEvent::Responding);

        let session_id = self.id.clone();
        let assistant = self.assistant.clone();
        let transcript = self.transcript.clone();
        let event_tx = self.event_tx.clone();
        let last_activity = self.last_activity.clone();
        let question = text.to_string();

        let turn = tokio::spawn(async move {
            let (reply, source) = match assistant.respond(&question).await {
                Ok(reply) => (reply.text, reply.source),
                Err(e) => {
                    tracing::error!(session_id = %session_id, error = %e, "Assistant failed");
                    (APOLOGY.to_string(), ReplySource::Apology)
                }
            };

            let bot = transcript.lock().append(Sender::Bot, reply);
            *last_activity.write() = Instant::now();
            drop(guard);

            metrics::counter!("chat_turns_total", "source" => source.as_str()).increment(1);
            tracing::info!(session_id = %session_id, source = source.as_str(), "Chat turn complete");
            let _ = event_tx.send(SessionEvent::BotMessage {
                message: bot.clone(),
                source,
            });
            (bot, source)
        });

        let (bot, source) = match turn.await {
            Ok(done) => done,
            Err(e) => {
                // The task died before appending its reply
                tracing::error!(session_id = %self.id, error = %e, "Chat turn aborted");
                let bot = self.transcript.lock().append(Sender::Bot, APOLOGY);
                (bot, ReplySource::Apology)
            }
        };

        Ok(ChatTurn { user, bot, source })
    }

    /// Clear the transcript back to the welcome message
    pub fn reset(&self) {
        self.touch();
        self.transcript.lock().reset();
        tracing::debug!(session_id = %self.id, "Transcript reset");
        let _ = self.event_tx.send(SessionEvent::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use branch_assistant_analytics::{AnalyticsError, AnalyticsSource, DateRange};
    use branch_assistant_config::Settings;
    use branch_assistant_core::{BranchComparison, FootfallDay, RealTimeStats};
    use branch_assistant_llm::{BackendHealth, ChatBackend, LlmError};

    struct EchoBackend;

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn health(&self) -> Result<BackendHealth, LlmError> {
            Ok(BackendHealth {
                status: "ok".into(),
                context_loaded: true,
            })
        }

        async fn chat(&self, message: &str) -> Result<String, LlmError> {
            Ok(format!("echo: {}", message))
        }

        fn endpoint(&self) -> &str {
            "echo"
        }
    }

    struct NoData;

    #[async_trait]
    impl AnalyticsSource for NoData {
        async fn footfall_trends(&self, _range: &DateRange) -> Result<Vec<FootfallDay>, AnalyticsError> {
            Ok(vec![])
        }

        async fn branch_comparison(&self, _range: &DateRange) -> Result<Vec<BranchComparison>, AnalyticsError> {
            Ok(vec![])
        }

        async fn real_time_stats(&self) -> Result<RealTimeStats, AnalyticsError> {
            Ok(RealTimeStats::default())
        }

        async fn refresh_data_context(&self) -> Result<(), AnalyticsError> {
            Ok(())
        }
    }

    /// Answers after a delay
    struct SlowBackend;

    #[async_trait]
    impl ChatBackend for SlowBackend {
        async fn health(&self) -> Result<BackendHealth, LlmError> {
            Ok(BackendHealth {
                status: "ok".into(),
                context_loaded: true,
            })
        }

        async fn chat(&self, message: &str) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(format!("late: {}", message))
        }

        fn endpoint(&self) -> &str {
            "slow"
        }
    }

    fn session() -> ChatSession {
        let assistant = Assistant::new(&Settings::default(), Arc::new(EchoBackend), Arc::new(NoData));
        ChatSession::new("test", Arc::new(assistant))
    }

    #[test]
    fn test_new_session_has_welcome() {
        let session = session();
        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::Bot);
        assert_eq!(session.state(), SessionState::AwaitingInput);
    }

    #[tokio::test]
    async fn test_send_appends_both_messages() {
        let session = session();
        let turn = session.send("  hello  ").await.unwrap();

        assert_eq!(turn.user.text, "hello");
        assert_eq!(turn.bot.text, "echo: hello");
        assert_eq!(turn.source, ReplySource::Primary);
        assert_eq!(session.message_count(), 3);
        assert_eq!(session.state(), SessionState::AwaitingInput);
    }

    #[tokio::test]
    async fn test_dropped_send_still_completes_turn() {
        let assistant = Assistant::new(&Settings::default(), Arc::new(SlowBackend), Arc::new(NoData));
        let session = ChatSession::new("slow", Arc::new(assistant));

        let waited = tokio::time::timeout(Duration::from_millis(20), session.send("hello")).await;
        assert!(waited.is_err());
        assert_eq!(session.state(), SessionState::AwaitingResponse);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let senders: Vec<Sender> = session.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Bot, Sender::User, Sender::Bot]);
        assert_eq!(session.messages()[2].text, "late: hello");
        assert_eq!(session.state(), SessionState::AwaitingInput);
    }

    #[test]
    fn test_expiry_follows_activity() {
        let session = session();
        assert!(!session.is_expired(Duration::from_secs(60)));

        std::thread::sleep(Duration::from_millis(30));
        assert!(session.is_expired(Duration::from_millis(10)));
        session.touch();
        assert!(!session.is_expired(Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn test_pending_reply_is_never_expired() {
        let assistant = Assistant::new(&Settings::default(), Arc::new(SlowBackend), Arc::new(NoData));
        let session = Arc::new(ChatSession::new("slow", Arc::new(assistant)));

        let sending = session.clone();
        let handle = tokio::spawn(async move { sending.send("hello").await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!session.is_expired(Duration::from_millis(1)));

        handle.await.unwrap().unwrap();
        assert_eq!(session.message_count(), 3);
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let session = session();
        assert!(matches!(session.send("   ").await, Err(AgentError::EmptyMessage)));
        assert_eq!(session.message_count(), 1);
    }

    #[tokio::test]
    async fn test_events_follow_the_turn() {
        let session = session();
        let mut events = session.subscribe();
        session.send("hi").await.unwrap();

        assert!(matches!(events.recv().await.unwrap(), SessionEvent::UserMessage(_)));
        assert!(matches!(events.recv().await.unwrap(), SessionEvent::Responding));
        assert!(matches!(
            events.recv().await.unwrap(),
            SessionEvent::BotMessage { source: ReplySource::Primary, .. }
        ));
    }

    #[tokio::test]
    async fn test_reset_keeps_only_welcome() {
        let session = session();
        session.send("one").await.unwrap();
        let before = session.messages().last().unwrap().id;

        session.reset();
        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].id > before);
    }
}
