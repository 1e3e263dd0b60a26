//! In-memory session store with idle expiry.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use medibot_core::session::SessionStore;
use medibot_types::chat::{SessionData, SessionId};
use medibot_types::error::RepositoryError;

#[derive(Debug, Clone)]
struct StoredSession {
    data: SessionData,
    touched_at: Instant,
}

/// Process-local `SessionStore` on a `DashMap`.
///
/// Values are cloned in and out; no map guard outlives a call.
pub struct InMemorySessionStore {
    sessions: DashMap<SessionId, StoredSession>,
    idle_timeout: Duration,
}

impl InMemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle for longer than the timeout.
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        let now = Instant::now();
        self.sessions
            .retain(|_, s| now.saturating_duration_since(s.touched_at) <= self.idle_timeout);
        before.saturating_sub(self.sessions.len())
    }

    fn is_expired(&self, stored: &StoredSession, now: Instant) -> bool {
        now.saturating_duration_since(stored.touched_at) > self.idle_timeout
    }
}

impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, RepositoryError> {
        let now = Instant::now();
        let found = self
            .sessions
            .get(id)
            .map(|s| (!self.is_expired(&s, now)).then(|| s.data.clone()));
        match found {
            Some(Some(data)) => Ok(Some(data)),
            Some(None) => {
                self.sessions.remove_if(id, |_, s| self.is_expired(s, now));
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<(), RepositoryError> {
        self.sessions.insert(
            *id,
            StoredSession {
                data: data.clone(),
                touched_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        self.sessions.remove(id);
        Ok(())
    }
}
