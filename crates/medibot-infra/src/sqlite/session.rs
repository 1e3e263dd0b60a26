//! SQLite session store implementation.
//!
//! Implements `SessionStore` from `medibot-core` using sqlx with split
//! read/write pools. Session data is stored as JSON text.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use medibot_core::session::SessionStore;
use medibot_types::chat::{SessionData, SessionId};
use medibot_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionStore`.
pub struct SqliteSessionStore {
    pool: DatabasePool,
    idle_timeout: Duration,
}

impl SqliteSessionStore {
    pub fn new(pool: DatabasePool, idle_timeout: Duration) -> Self {
        Self { pool, idle_timeout }
    }

    /// Delete sessions idle for longer than the timeout.
    pub async fn purge_expired(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE updated_at < ?")
            .bind(format_datetime(&self.cutoff()))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(result.rows_affected())
    }

    fn cutoff(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.idle_timeout)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fixed-width RFC 3339 in UTC, so stored values sort lexicographically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

// ---------------------------------------------------------------------------
// SessionStore implementation
// ---------------------------------------------------------------------------

impl SessionStore for SqliteSessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, RepositoryError> {
        let row = sqlx::query("SELECT data, updated_at FROM sessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let updated_at: String = row
            .try_get("updated_at")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        if parse_datetime(&updated_at)? < self.cutoff() {
            return Ok(None);
        }

        let data: String = row
            .try_get("data")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let session = serde_json::from_str(&data)
            .map_err(|e| RepositoryError::Serialization(format!("invalid session JSON: {e}")))?;
        Ok(Some(session))
    }

    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(data)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        sqlx::query(
            "INSERT INTO sessions (id, data, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
        )
        .bind(id.to_string())
        .bind(json)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url;
    use medibot_types::chat::{ChatMessage, FeedbackEntry};

    const DAY: Duration = Duration::from_secs(86_400);

    async fn test_store(idle_timeout: Duration) -> (SqliteSessionStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("sessions.db");
        let pool = DatabasePool::new(&database_url(&db_path.display().to_string()))
            .await
            .unwrap();
        (SqliteSessionStore::new(pool, idle_timeout), dir)
    }

    fn sample() -> SessionData {
        let mut data = SessionData::default();
        data.push_message(ChatMessage::now("what is acne", "A skin condition."), 20);
        data.feedback_data.push(FeedbackEntry {
            kind: Some("up".into()),
            timestamp: None,
        });
        data
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let (store, _dir) = test_store(DAY).await;
        let id = SessionId::new();

        assert!(store.load(&id).await.unwrap().is_none());
        let data = sample();
        store.save(&id, &data).await.unwrap();
        assert_eq!(store.load(&id).await.unwrap(), Some(data));
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let (store, _dir) = test_store(DAY).await;
        let id = SessionId::new();
        store.save(&id, &sample()).await.unwrap();
        store.save(&id, &SessionData::default()).await.unwrap();
        assert_eq!(store.load(&id).await.unwrap(), Some(SessionData::default()));
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, _dir) = test_store(DAY).await;
        let id = SessionId::new();
        store.save(&id, &sample()).await.unwrap();
        store.remove(&id).await.unwrap();
        assert!(store.load(&id).await.unwrap().is_none());
        // Removing again is fine.
        store.remove(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_idle_session_expires_and_is_purged() {
        let (store, _dir) = test_store(Duration::ZERO).await;
        let id = SessionId::new();
        store.save(&id, &sample()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(store.load(&id).await.unwrap().is_none());
        assert_eq!(store.purge_expired().await.unwrap(), 1);
    }
}
