//! Chat messages and the session transcript

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who sent a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Dashboard user
    User,
    /// Assistant reply
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Time-based id, strictly increasing within a transcript
    pub id: u64,
    /// Message body (markdown-like for bot messages)
    pub text: String,
    /// Sender
    pub sender: Sender,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

/// Issues millisecond timestamps as ids, bumping past the last id when the
/// clock has not advanced (or went backwards).
#[derive(Debug, Default, Clone)]
pub struct MessageIdGenerator {
    last: u64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for a message created at `at`
    pub fn next_at(&mut self, at: DateTime<Utc>) -> u64 {
        let candidate = at.timestamp_millis().max(0) as u64;
        let id = candidate.max(self.last + 1);
        self.last = id;
        id
    }

    /// Last id handed out (0 if none)
    pub fn last(&self) -> u64 {
        self.last
    }
}

/// Append-only ordered list of chat messages.
///
/// Insertion order is display order. The only way to remove messages is
/// [`Transcript::reset`], which re-seeds the welcome message.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    ids: MessageIdGenerator,
    welcome: String,
}

impl Transcript {
    /// Create a transcript seeded with a bot welcome message
    pub fn new(welcome: impl Into<String>) -> Self {
        let mut transcript = Self {
            messages: Vec::new(),
            ids: MessageIdGenerator::new(),
            welcome: welcome.into(),
        };
        let welcome = transcript.welcome.clone();
        transcript.append(Sender::Bot, welcome);
        transcript
    }

    /// Append a message and return a copy of it
    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> ChatMessage {
        let timestamp = Utc::now();
        let message = ChatMessage {
            id: self.ids.next_at(timestamp),
            text: text.into(),
            sender,
            timestamp,
        };
        self.messages.push(message.clone());
        message
    }

    /// Clear the transcript back to the welcome message. Ids keep increasing.
    pub fn reset(&mut self) {
        self.messages.clear();
        let welcome = self.welcome.clone();
        self.append(Sender::Bot, welcome);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of user messages sent so far
    pub fn user_turns(&self) -> usize {
        self.messages.iter().filter(|m| m.sender == Sender::User).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ids_increase_when_clock_stalls() {
        let mut ids = MessageIdGenerator::new();
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        let first = ids.next_at(at);
        let second = ids.next_at(at);
        let third = ids.next_at(at - chrono::Duration::seconds(5));

        assert_eq!(first, 1_700_000_000_000);
        assert_eq!(second, first + 1);
        assert_eq!(third, second + 1);
    }

    #[test]
    fn test_transcript_starts_with_welcome() {
        let transcript = Transcript::new("Welcome!");
        assert_eq!(transcript.len(), 1);
        assert!(transcript.messages()[0].is_bot());
        assert_eq!(transcript.messages()[0].text, "Welcome!");
    }

    #[test]
    fn test_transcript_append_only_order() {
        let mut transcript = Transcript::new("Welcome!");
        for i in 0..5 {
            transcript.append(Sender::User, format!("question {}", i));
            transcript.append(Sender::Bot, format!("answer {}", i));
        }

        assert_eq!(transcript.len(), 11);
        assert_eq!(transcript.user_turns(), 5);
        let ids: Vec<u64> = transcript.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(transcript.last().unwrap().text, "answer 4");
    }

    #[test]
    fn test_reset_keeps_ids_increasing() {
        let mut transcript = Transcript::new("Welcome!");
        let before = transcript.append(Sender::User, "hi").id;
        transcript.reset();

        assert_eq!(transcript.len(), 1);
        assert!(transcript.messages()[0].id > before);
    }

    #[test]
    fn test_sender_serialization() {
        let json = serde_json::to_string(&Sender::Bot).unwrap();
        assert_eq!(json, "\"bot\"");
    }
}
