//! Chat history, feedback and session types for Medibot.
//!
//! A session is keyed by a client-held cookie and owns an ordered chat
//! history plus an append-only feedback log. Nothing is shared between
//! sessions.

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Timestamp layout used for history entries (`2024-01-01 09:30:00.123456`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Current local wall-clock time rendered with [`TIMESTAMP_FORMAT`].
pub fn local_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Opaque identifier of a client session, carried in a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a fresh random session id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(SessionId)
    }
}

/// One question/answer exchange in a session's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub question: String,
    pub answer: String,
    pub timestamp: String,
}

impl ChatMessage {
    /// Build an exchange stamped with the current local time.
    pub fn now(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: local_timestamp(),
        }
    }
}

/// A thumbs-up/down style feedback record.
///
/// Both fields are passed through exactly as the client sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub timestamp: Option<String>,
}

/// Everything stored for one client session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Exchanges in insertion order (oldest first).
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
    /// Feedback records in insertion order.
    #[serde(default)]
    pub feedback_data: Vec<FeedbackEntry>,
}

impl SessionData {
    /// Append an exchange, then drop the oldest entries beyond `limit`.
    pub fn push_message(&mut self, message: ChatMessage, limit: usize) {
        self.chat_history.push(message);
        if self.chat_history.len() > limit {
            let excess = self.chat_history.len() - limit;
            self.chat_history.drain(..excess);
        }
    }
}
