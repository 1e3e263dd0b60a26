//! Fixed-window, per-client rate limiter backed by `DashMap`.
//!
//! Each `(client, rule)` pair owns one window that opens on its first hit
//! and lasts for the rule's period. Counters are process-local.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use medibot_core::ratelimit::RateLimiter;
use medibot_types::error::RepositoryError;
use medibot_types::ratelimit::{RateLimitDecision, RateLimitRule};

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Default)]
pub struct InMemoryRateLimiter {
    windows: DashMap<(String, RateLimitRule), Window>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit at an explicit instant.
    pub fn hit_at(&self, client: &str, rule: &RateLimitRule, now: Instant) -> RateLimitDecision {
        let period = rule.period();
        let mut window = self
            .windows
            .entry((client.to_string(), *rule))
            .or_insert(Window {
                started: now,
                count: 0,
            });

        let elapsed = now.saturating_duration_since(window.started);
        if elapsed >= period {
            window.started = now;
            window.count = 0;
        }

        if window.count >= rule.limit {
            let retry_after = period.saturating_sub(now.saturating_duration_since(window.started));
            return RateLimitDecision::Limited {
                retry_after: retry_after.max(Duration::from_secs(1)),
            };
        }

        window.count += 1;
        RateLimitDecision::Allowed {
            remaining: rule.limit - window.count,
        }
    }

    /// Drop windows whose period has elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.windows.len();
        let now = Instant::now();
        self.windows
            .retain(|(_, rule), w| now.saturating_duration_since(w.started) < rule.period());
        before.saturating_sub(self.windows.len())
    }
}

impl RateLimiter for InMemoryRateLimiter {
    async fn hit(
        &self,
        client: &str,
        rule: &RateLimitRule,
    ) -> Result<RateLimitDecision, RepositoryError> {
        Ok(self.hit_at(client, rule, Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(s: &str) -> RateLimitRule {
        s.parse().unwrap()
    }

    #[test]
    fn test_allows_up_to_limit_then_limits() {
        let limiter = InMemoryRateLimiter::new();
        let r = rule("3 per minute");
        let t0 = Instant::now();

        assert_eq!(limiter.hit_at("1.2.3.4", &r, t0), RateLimitDecision::Allowed { remaining: 2 });
        assert_eq!(limiter.hit_at("1.2.3.4", &r, t0), RateLimitDecision::Allowed { remaining: 1 });
        assert_eq!(limiter.hit_at("1.2.3.4", &r, t0), RateLimitDecision::Allowed { remaining: 0 });

        let later = t0 + Duration::from_secs(20);
        assert_eq!(
            limiter.hit_at("1.2.3.4", &r, later),
            RateLimitDecision::Limited {
                retry_after: Duration::from_secs(40)
            }
        );
    }

    #[test]
    fn test_window_resets_after_period() {
        let limiter = InMemoryRateLimiter::new();
        let r = rule("1 per minute");
        let t0 = Instant::now();

        assert!(limiter.hit_at("c", &r, t0).is_allowed());
        assert!(!limiter.hit_at("c", &r, t0 + Duration::from_secs(59)).is_allowed());
        assert!(limiter.hit_at("c", &r, t0 + Duration::from_secs(60)).is_allowed());
    }

    #[test]
    fn test_clients_and_rules_are_independent() {
        let limiter = InMemoryRateLimiter::new();
        let per_minute = rule("1 per minute");
        let per_hour = rule("1 per hour");
        let t0 = Instant::now();

        assert!(limiter.hit_at("a", &per_minute, t0).is_allowed());
        assert!(limiter.hit_at("b", &per_minute, t0).is_allowed());
        assert!(limiter.hit_at("a", &per_hour, t0).is_allowed());
        assert!(!limiter.hit_at("a", &per_minute, t0).is_allowed());
        assert_eq!(limiter.windows.len(), 3);
    }

    #[test]
    fn test_retry_after_is_at_least_one_second() {
        let limiter = InMemoryRateLimiter::new();
        let r = rule("1 per second");
        let t0 = Instant::now();
        limiter.hit_at("c", &r, t0);
        match limiter.hit_at("c", &r, t0 + Duration::from_millis(999)) {
            RateLimitDecision::Limited { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(1))
            }
            other => panic!("expected limited, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_trait_hit_and_purge() {
        let limiter = InMemoryRateLimiter::new();
        let decision = limiter.hit("c", &rule("5 per day")).await.unwrap();
        assert_eq!(decision, RateLimitDecision::Allowed { remaining: 4 });
        assert_eq!(limiter.purge_expired(), 0);
        assert_eq!(limiter.windows.len(), 1);
    }
}
