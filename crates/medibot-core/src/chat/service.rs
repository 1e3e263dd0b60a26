//! Chat service orchestrating validation, caching, answering and session
//! bookkeeping.
//!
//! ChatService coordinates between the ResponseCache, SessionStore and
//! AnswerService to serve one question: validate, look up the cache, call
//! the answering service on a miss, then record the exchange in the
//! session's bounded history.

use std::time::Duration;

use medibot_types::chat::{ChatMessage, FeedbackEntry, SessionData, SessionId};
use medibot_types::error::{ChatError, RepositoryError};
use tracing::{debug, info, warn};

use crate::cache::{ResponseCache, fingerprint};
use crate::chat::validation::validate_message;
use crate::rag::answer::AnswerService;
use crate::session::SessionStore;

/// Tunables for the chat pipeline.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub min_message_chars: usize,
    pub max_message_chars: usize,
    pub history_limit: usize,
    pub cache_ttl: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            min_message_chars: 3,
            max_message_chars: 1000,
            history_limit: 20,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// A successful chat answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
    /// Whether the answer came from the response cache.
    pub cached: bool,
}

/// Orchestrates the chat request pipeline.
///
/// Generic over its ports to maintain clean architecture (medibot-core
/// never depends on medibot-infra).
pub struct ChatService<C: ResponseCache, S: SessionStore, A: AnswerService> {
    cache: C,
    sessions: S,
    answers: A,
    settings: ChatSettings,
}

impl<C: ResponseCache, S: SessionStore, A: AnswerService> ChatService<C, S, A> {
    pub fn new(cache: C, sessions: S, answers: A, settings: ChatSettings) -> Self {
        Self {
            cache,
            sessions,
            answers,
            settings,
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub fn answers(&self) -> &A {
        &self.answers
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    // --- Chat ---

    /// Answer a raw `msg` value for a session.
    ///
    /// Rejected messages leave the cache and session untouched. A cache hit
    /// is still recorded in history with a fresh timestamp.
    pub async fn ask(&self, session: &SessionId, raw: Option<&str>) -> Result<ChatReply, ChatError> {
        let message = validate_message(
            raw,
            self.settings.min_message_chars,
            self.settings.max_message_chars,
        )
        .inspect_err(|e| warn!(%session, error = %e, "rejected chat message"))?;

        info!(%session, query = %message, "user query");

        let key = fingerprint(&message);
        if let Some(answer) = self.cache.get(&key).await?.filter(|a| !a.is_empty()) {
            info!(%session, "returning cached response");
            self.record_exchange(session, &message, &answer).await?;
            return Ok(ChatReply {
                answer,
                cached: true,
            });
        }

        let response = self.answers.answer(&message).await?;
        debug!(passages = response.context.len(), "answering service responded");
        let answer = response.answer.ok_or_else(|| {
            ChatError::MalformedResponse("answering service response has no answer".to_string())
        })?;

        self.record_exchange(session, &message, &answer).await?;
        self.cache.set(&key, &answer, self.settings.cache_ttl).await?;

        info!(%session, "response generated successfully");
        Ok(ChatReply {
            answer,
            cached: false,
        })
    }

    async fn record_exchange(
        &self,
        session: &SessionId,
        question: &str,
        answer: &str,
    ) -> Result<(), RepositoryError> {
        let mut data = self.load_or_default(session).await?;
        data.push_message(ChatMessage::now(question, answer), self.settings.history_limit);
        self.sessions.save(session, &data).await
    }

    // --- History ---

    /// The session's history, oldest first. Unknown sessions have none.
    pub async fn history(&self, session: &SessionId) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self
            .sessions
            .load(session)
            .await?
            .map(|d| d.chat_history)
            .unwrap_or_default())
    }

    /// Reset the session's history. The feedback log is kept.
    pub async fn clear_history(&self, session: &SessionId) -> Result<(), RepositoryError> {
        let mut data = self.load_or_default(session).await?;
        data.chat_history.clear();
        self.sessions.save(session, &data).await?;
        info!(%session, "history cleared");
        Ok(())
    }

    // --- Feedback ---

    /// Append a feedback record to the session's log.
    pub async fn record_feedback(
        &self,
        session: &SessionId,
        entry: FeedbackEntry,
    ) -> Result<(), RepositoryError> {
        let mut data = self.load_or_default(session).await?;
        info!(%session, feedback = ?entry.kind, "feedback received");
        data.feedback_data.push(entry);
        self.sessions.save(session, &data).await
    }

    /// The session's feedback log, oldest first.
    pub async fn feedback(&self, session: &SessionId) -> Result<Vec<FeedbackEntry>, RepositoryError> {
        Ok(self
            .sessions
            .load(session)
            .await?
            .map(|d| d.feedback_data)
            .unwrap_or_default())
    }

    async fn load_or_default(&self, session: &SessionId) -> Result<SessionData, RepositoryError> {
        Ok(self.sessions.load(session).await?.unwrap_or_default())
    }
}
