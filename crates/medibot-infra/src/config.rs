//! Configuration loader for Medibot.
//!
//! Reads `medibot.toml` and deserializes it into [`AppConfig`]. Falls back
//! to defaults when the file is missing or malformed, then applies
//! environment overrides for the listener address.

use std::path::Path;

use medibot_types::config::AppConfig;
use medibot_types::rag::RagError;
use secrecy::SecretString;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "medibot.toml";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Apply `MEDIBOT_HOST`, `MEDIBOT_PORT` and `PORT` overrides.
///
/// `MEDIBOT_PORT` wins over `PORT`. Unparseable ports are ignored with a warning.
pub fn apply_env_overrides(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    if let Some(host) = lookup("MEDIBOT_HOST").filter(|h| !h.is_empty()) {
        config.server.host = host;
    }

    for var in ["PORT", "MEDIBOT_PORT"] {
        if let Some(raw) = lookup(var) {
            match raw.parse::<u16>() {
                Ok(port) => config.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid {var}={raw}"),
            }
        }
    }

    config
}

/// Process-environment lookup for [`apply_env_overrides`].
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// API keys for the external collaborators.
///
/// Keys are wrapped in [`SecretString`] and never appear in Debug output.
pub struct ApiCredentials {
    pub pinecone_api_key: SecretString,
    pub openai_api_key: SecretString,
}

impl ApiCredentials {
    pub const PINECONE_API_KEY: &'static str = "PINECONE_API_KEY";
    pub const OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";

    /// Read both keys through `lookup`. Empty values count as missing.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RagError> {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
                .ok_or_else(|| RagError::MissingCredential(format!("{name} is not set")))
        };
        Ok(Self {
            pinecone_api_key: require(Self::PINECONE_API_KEY)?,
            openai_api_key: require(Self::OPENAI_API_KEY)?,
        })
    }

    pub fn from_env() -> Result<Self, RagError> {
        Self::resolve(env_lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(DEFAULT_CONFIG_FILE)).await;
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(
            &path,
            r#"
[server]
port = 5000

[chat]
history_limit = 5

[rate_limit]
enabled = false
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.chat.history_limit, 5);
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.chat.max_message_chars, 1000);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn env_overrides_host_and_port() {
        let config = apply_env_overrides(
            AppConfig::default(),
            vars(&[("MEDIBOT_HOST", "127.0.0.1"), ("PORT", "3000")]),
        );
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn env_medibot_port_wins_over_port() {
        let config = apply_env_overrides(
            AppConfig::default(),
            vars(&[("PORT", "3000"), ("MEDIBOT_PORT", "4000")]),
        );
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn env_invalid_port_is_ignored() {
        let config = apply_env_overrides(AppConfig::default(), vars(&[("MEDIBOT_PORT", "http")]));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn credentials_resolve() {
        let creds = ApiCredentials::resolve(vars(&[
            ("PINECONE_API_KEY", "pc-key"),
            ("OPENAI_API_KEY", "sk-key"),
        ]))
        .unwrap();
        assert_eq!(creds.pinecone_api_key.expose_secret(), "pc-key");
        assert_eq!(creds.openai_api_key.expose_secret(), "sk-key");
    }

    #[test]
    fn credentials_missing_or_blank() {
        let err = ApiCredentials::resolve(vars(&[("OPENAI_API_KEY", "sk-key")]))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "missing credential: PINECONE_API_KEY is not set");

        let err = ApiCredentials::resolve(vars(&[
            ("PINECONE_API_KEY", "pc-key"),
            ("OPENAI_API_KEY", "  "),
        ]))
        .err()
        .unwrap();
        assert!(matches!(err, RagError::MissingCredential(ref m) if m.contains("OPENAI_API_KEY")));
    }

    #[tokio::test]
    async fn example_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../medibot.example.toml");
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: AppConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.rate_limit.chat_limits[0].to_string(), "10 per 1 minute");
        assert_eq!(parsed.rag.embedding_dimensions, Some(384));

        let loaded = load_config(&path).await;
        assert_eq!(loaded.session.cookie_name, "medibot_session");
        assert_eq!(loaded.rate_limit.default_limits.len(), 2);
    }
}
