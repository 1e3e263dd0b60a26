//! Retrieval-augmented answering types for Medibot.
//!
//! These types model the data shapes exchanged with the external
//! collaborators: chat-model messages, vector-index matches, retrieved
//! documents and the final answering-service response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Role of a message sent to the chat model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a chat-model conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
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
}

/// A candidate returned by the vector index, with its stored vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMatch {
    pub id: String,
    pub score: f32,
    /// Stored embedding; empty when the index did not return values.
    #[serde(default)]
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A retrieved passage of the medical corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    /// Build a document from an index match, reading the passage text from
    /// `text_key` and keeping the remaining metadata.
    ///
    /// Returns `None` when the match carries no text under `text_key`.
    pub fn from_match(m: &IndexMatch, text_key: &str) -> Option<Self> {
        let text = m.metadata.get(text_key)?.as_str()?.to_string();
        let metadata = m
            .metadata
            .iter()
            .filter(|(k, _)| k.as_str() != text_key)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Some(Self {
            page_content: text,
            metadata,
        })
    }
}

/// Response of the answering service for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    /// The question as it was sent.
    pub input: String,
    /// Passages the answer was grounded on.
    #[serde(default)]
    pub context: Vec<Document>,
    /// The generated answer. `None` means the model returned no content.
    pub answer: Option<String>,
}

/// Errors from the answering service and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("vector index '{0}' not found")]
    IndexNotFound(String),

    #[error("answering service unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_role_display() {
        assert_eq!(MessageRole::System.to_string(), "system");
        assert_eq!(MessageRole::User.to_string(), "user");
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn test_document_from_match_splits_text() {
        let m: IndexMatch = serde_json::from_value(json!({
            "id": "doc-1",
            "score": 0.9,
            "metadata": { "text": "Acne is a skin condition.", "source": "book.pdf", "page": 12 }
        }))
        .unwrap();
        let doc = Document::from_match(&m, "text").unwrap();
        assert_eq!(doc.page_content, "Acne is a skin condition.");
        assert_eq!(doc.metadata["source"], "book.pdf");
        assert!(!doc.metadata.contains_key("text"));
        assert!(m.values.is_empty());
    }

    #[test]
    fn test_document_from_match_without_text() {
        let m = IndexMatch {
            id: "x".into(),
            score: 0.1,
            values: vec![],
            metadata: Map::new(),
        };
        assert!(Document::from_match(&m, "text").is_none());
    }

    #[test]
    fn test_rag_error_display() {
        let err = RagError::IndexNotFound("medical-chatbot".into());
        assert_eq!(err.to_string(), "vector index 'medical-chatbot' not found");
    }
}
