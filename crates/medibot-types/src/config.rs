//! Configuration types for Medibot.
//!
//! `AppConfig` represents the top-level `medibot.toml`. Every section and
//! every field has a default, so an empty or missing file yields a fully
//! working configuration.

use serde::{Deserialize, Serialize};

use crate::ratelimit::RateLimitRule;

/// Top-level configuration for the Medibot service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub chat: ChatConfig,
    pub cache: CacheConfig,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
    pub rag: RagConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`. Skipped when absent on disk.
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: Some("static".to_string()),
        }
    }
}

/// Message validation and history bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Minimum trimmed message length, in characters.
    pub min_message_chars: usize,
    /// Maximum trimmed message length, in characters.
    pub max_message_chars: usize,
    /// Number of most recent exchanges kept per session.
    pub history_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            min_message_chars: 3,
            max_message_chars: 1000,
            history_limit: 20,
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_entries: 500,
        }
    }
}

/// Where per-session state lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackendKind {
    #[default]
    Memory,
    Sqlite,
}

/// Session storage and cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub backend: SessionBackendKind,
    pub cookie_name: String,
    /// Sessions untouched for this long are discarded.
    pub idle_timeout_secs: u64,
    /// Database file used by the `sqlite` backend.
    pub sqlite_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackendKind::Memory,
            cookie_name: "medibot_session".to_string(),
            idle_timeout_secs: 86_400,
            sqlite_path: "medibot.db".to_string(),
        }
    }
}

/// Per-client request limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Applied to every rate-limited route.
    pub default_limits: Vec<RateLimitRule>,
    /// Additionally applied to the chat endpoint.
    pub chat_limits: Vec<RateLimitRule>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        use crate::ratelimit::RateUnit;
        Self {
            enabled: true,
            default_limits: vec![
                RateLimitRule::new(200, 1, RateUnit::Day),
                RateLimitRule::new(50, 1, RateUnit::Hour),
            ],
            chat_limits: vec![RateLimitRule::new(10, 1, RateUnit::Minute)],
        }
    }
}

/// Retrieval and generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Name of the existing vector index.
    pub index_name: String,
    pub pinecone_control_url: String,
    pub pinecone_api_version: String,
    pub openai_base_url: String,
    pub chat_model: String,
    /// Sampling temperature; provider default when unset.
    pub temperature: Option<f32>,
    pub embedding_model: String,
    /// Requested embedding width; must match the index dimension.
    pub embedding_dimensions: Option<u32>,
    /// Passages handed to the model.
    pub top_k: usize,
    /// Candidates fetched before diversity re-ranking.
    pub fetch_k: usize,
    /// 1.0 favors relevance, 0.0 favors diversity.
    pub lambda_mult: f32,
    /// Metadata key holding the passage text.
    pub text_key: String,
    pub request_timeout_secs: u64,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            index_name: "medical-chatbot".to_string(),
            pinecone_control_url: "https://api.pinecone.io".to_string(),
            pinecone_api_version: "2024-07".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o".to_string(),
            temperature: None,
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimensions: Some(384),
            top_k: 4,
            fetch_k: 10,
            lambda_mult: 0.7,
            text_key: "text".to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// Log sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file written alongside stdout. `None` disables it.
    pub file: Option<String>,
    /// Export spans through OpenTelemetry (stdout exporter).
    pub otel: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: Some("medical_chatbot.log".to_string()),
            otel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratelimit::RateUnit;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.chat.history_limit, 20);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.session.backend, SessionBackendKind::Memory);
        assert_eq!(config.rag.index_name, "medical-chatbot");
        assert_eq!(config.rag.top_k, 4);
        assert_eq!(config.rag.fetch_k, 10);
        assert_eq!(config.rate_limit.default_limits.len(), 2);
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.chat.max_message_chars, 1000);
        assert_eq!(
            config.logging.file.as_deref(),
            Some("medical_chatbot.log")
        );
    }

    #[test]
    fn test_app_config_deserialize_partial_sections() {
        let toml_str = r#"
[server]
port = 9000

[session]
backend = "sqlite"

[rate_limit]
chat_limits = ["3 per 10 seconds"]

[rag]
chat_model = "gpt-4o-mini"
temperature = 0.2
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.session.backend, SessionBackendKind::Sqlite);
        assert_eq!(config.session.cookie_name, "medibot_session");
        assert_eq!(
            config.rate_limit.chat_limits,
            vec![RateLimitRule::new(3, 10, RateUnit::Second)]
        );
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rag.chat_model, "gpt-4o-mini");
        assert_eq!(config.rag.temperature, Some(0.2));
        assert_eq!(config.rag.embedding_model, "text-embedding-3-small");
    }

    #[test]
    fn test_app_config_rejects_bad_rule() {
        let toml_str = r#"
[rate_limit]
default_limits = ["often"]
"#;
        assert!(toml::from_str::<AppConfig>(toml_str).is_err());
    }
}
