//! In-process response cache with TTL expiry and bounded capacity.
//!
//! Entries live in a `DashMap`. Expired entries read as misses and are
//! dropped lazily on access, on insert when the cache is full, and by the
//! periodic [`InMemoryResponseCache::purge_expired`] sweep. When the cache
//! is full after dropping expired entries, the oldest entry is evicted.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use medibot_core::cache::ResponseCache;
use medibot_types::error::RepositoryError;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    inserted_at: Instant,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local answer cache shared across all sessions.
pub struct InMemoryResponseCache {
    entries: DashMap<String, CacheEntry>,
    max_entries: usize,
}

impl InMemoryResponseCache {
    /// `max_entries` is clamped to at least 1.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let now = Instant::now();
        self.entries.retain(|_, e| e.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|e| e.value().inserted_at)
            .map(|e| e.key().clone());
        if let Some(key) = oldest {
            debug!(key = %key, "evicting oldest cache entry");
            self.entries.remove(&key);
        }
    }
}

impl ResponseCache for InMemoryResponseCache {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let now = Instant::now();
        let hit = self
            .entries
            .get(key)
            .map(|e| e.is_live(now).then(|| e.value.clone()));
        match hit {
            Some(Some(value)) => Ok(Some(value)),
            Some(None) => {
                self.entries.remove_if(key, |_, e| !e.is_live(now));
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RepositoryError> {
        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            self.purge_expired();
            while self.entries.len() >= self.max_entries {
                self.evict_oldest();
            }
        }

        let now = Instant::now();
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                inserted_at: now,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}
