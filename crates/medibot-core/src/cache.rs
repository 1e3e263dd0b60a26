//! Response cache port and query fingerprinting.

use std::time::Duration;

use medibot_types::error::RepositoryError;
use sha2::{Digest, Sha256};

/// Key-value store of previously generated answers.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in medibot-infra.
pub trait ResponseCache: Send + Sync {
    /// Look up a live entry. Expired entries read as `None`.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Store `value` under `key` for `ttl`, replacing any previous entry.
    fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Cache key for a user question.
///
/// Questions that differ only in letter case or outer whitespace map to the
/// same key: `query:` followed by the SHA-256 hex digest of the trimmed,
/// lower-cased text.
pub fn fingerprint(message: &str) -> String {
    let normalized = message.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!("query:{digest:x}")
}
