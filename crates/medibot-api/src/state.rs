//! Application state shared by the HTTP handlers and CLI commands.
//!
//! AppState holds all services needed by the handlers. Generic services are
//! pinned to their concrete infra types via type aliases.

use std::sync::Arc;
use std::time::Duration;

use medibot_core::chat::service::{ChatService, ChatSettings};
use medibot_core::rag::answer::{BoxAnswerService, UnavailableAnswerService};
use medibot_infra::cache::InMemoryResponseCache;
use medibot_infra::config::ApiCredentials;
use medibot_infra::rag::build_rag_chain;
use medibot_infra::ratelimit::InMemoryRateLimiter;
use medibot_infra::session::SessionBackend;
use medibot_types::config::AppConfig;
use serde_json::{Value, json};
use tracing::{info, warn};

/// Concrete type alias for the chat service wired to the infra backends.
pub type ConcreteChatService = ChatService<InMemoryResponseCache, SessionBackend, BoxAnswerService>;

/// Outcome of initializing the answering pipeline at boot.
///
/// Captured once; readiness checks never contact the collaborators again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady { error: String },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }

    /// JSON body reported by `GET /ready` and `medibot check`.
    pub fn to_json(&self) -> Value {
        match self {
            Readiness::Ready => json!({
                "status": "ready",
                "pinecone": "connected",
                "llm": "initialized",
            }),
            Readiness::NotReady { error } => json!({
                "status": "not ready",
                "error": error,
            }),
        }
    }
}

/// Shared application state holding all services.
///
/// Cheap to clone: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub chat_service: Arc<ConcreteChatService>,
    pub rate_limiter: Arc<InMemoryRateLimiter>,
    pub readiness: Arc<Readiness>,
}

impl AppState {
    /// Build every service from the configuration.
    ///
    /// A failure to reach the vector index or the language model does not
    /// abort start-up: the server comes up, `/ready` reports the error and
    /// chat requests fail with a server error.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let sessions = SessionBackend::from_config(&config.session).await?;
        let cache = InMemoryResponseCache::new(config.cache.max_entries);

        let (answers, readiness) = match init_answers(&config).await {
            Ok(answers) => (answers, Readiness::Ready),
            Err(error) => {
                warn!(%error, "answering pipeline unavailable");
                (
                    BoxAnswerService::new(UnavailableAnswerService::new(error.clone())),
                    Readiness::NotReady { error },
                )
            }
        };

        let chat_service = ChatService::new(cache, sessions, answers, chat_settings(&config));
        Ok(Self::from_parts(config, chat_service, readiness))
    }

    /// Assemble state from an already-built chat service.
    pub fn from_parts(
        config: AppConfig,
        chat_service: ConcreteChatService,
        readiness: Readiness,
    ) -> Self {
        Self {
            config: Arc::new(config),
            chat_service: Arc::new(chat_service),
            rate_limiter: Arc::new(InMemoryRateLimiter::new()),
            readiness: Arc::new(readiness),
        }
    }
}

async fn init_answers(config: &AppConfig) -> Result<BoxAnswerService, String> {
    let credentials = ApiCredentials::from_env().map_err(|e| e.to_string())?;
    let chain = build_rag_chain(&config.rag, credentials)
        .await
        .map_err(|e| e.to_string())?;
    info!("answering pipeline ready");
    Ok(BoxAnswerService::new(chain))
}

/// Chat pipeline tunables taken from the configuration.
pub fn chat_settings(config: &AppConfig) -> ChatSettings {
    ChatSettings {
        min_message_chars: config.chat.min_message_chars,
        max_message_chars: config.chat.max_message_chars,
        history_limit: config.chat.history_limit,
        cache_ttl: Duration::from_secs(config.cache.ttl_secs),
    }
}
