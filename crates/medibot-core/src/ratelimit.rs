//! Rate limiter port.

use medibot_types::error::RepositoryError;
use medibot_types::ratelimit::{RateLimitDecision, RateLimitRule};

/// Per-client hit counting against a rule's windows.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in medibot-infra.
pub trait RateLimiter: Send + Sync {
    /// Record one hit for `client` under `rule`.
    ///
    /// A limited hit is not counted.
    fn hit(
        &self,
        client: &str,
        rule: &RateLimitRule,
    ) -> impl std::future::Future<Output = Result<RateLimitDecision, RepositoryError>> + Send;
}
