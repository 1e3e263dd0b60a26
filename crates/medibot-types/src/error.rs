use thiserror::Error;

use crate::rag::RagError;

/// Reasons a chat message is rejected before any work is done.
///
/// The display strings are shown verbatim to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Message cannot be empty")]
    Empty,

    #[error("Message is too long. Please keep it under {max} characters.")]
    TooLong { len: usize, max: usize },

    #[error("Message is too short. Please provide more details.")]
    TooShort { len: usize, min: usize },
}

/// Errors from the chat pipeline, split by who is at fault.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The client sent an unusable message.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The answering service replied without an answer field.
    #[error("malformed answering-service response: {0}")]
    MalformedResponse(String),

    /// The answering service failed.
    #[error("answering service error: {0}")]
    Upstream(#[from] RagError),

    /// Session or cache storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl ChatError {
    /// Whether the client caused this error. A malformed answering-service
    /// response still surfaces as a 400 but is not the client's fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ChatError::Validation(_))
    }
}

/// Errors from storage backends (used by trait definitions in medibot-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
