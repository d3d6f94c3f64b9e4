//! Thread transcript types
//!
//! A reasoning thread is a chat conversation; its transcript is the ordered
//! list of messages exchanged so far, independent of any provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Persisted state of one reasoning thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadTranscript {
    pub id: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl ThreadTranscript {
    /// Starts a transcript seeded with the system instructions
    pub fn new(id: impl Into<String>, model: impl Into<String>, system: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            model: model.into(),
            created_at: now,
            updated_at: now,
            messages: vec![ChatMessage::system(system)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Number of completed user/assistant exchanges
    pub fn turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::Assistant)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transcript_has_system_message() {
        let transcript = ThreadTranscript::new("t-1", "gpt-4o-mini", "Be terse.");
        assert_eq!(transcript.messages, vec![ChatMessage::system("Be terse.")]);
        assert_eq!(transcript.turns(), 0);
        assert_eq!(transcript.created_at, transcript.updated_at);
    }

    #[test]
    fn test_push_counts_turns() {
        let mut transcript = ThreadTranscript::new("t-1", "m", "sys");
        transcript.push(ChatMessage::user("why red?"));
        transcript.push(ChatMessage::assistant("lint"));
        assert_eq!(transcript.turns(), 1);
        assert_eq!(transcript.messages[1].role, MessageRole::User);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&ChatMessage::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }
}
