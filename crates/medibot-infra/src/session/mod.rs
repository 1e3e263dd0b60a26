//! Session storage backends.
//!
//! `SessionBackend` selects between the in-memory and SQLite stores at
//! start-up and is itself a `SessionStore`, so the rest of the application
//! holds one concrete type regardless of configuration.

pub mod memory;

use std::time::Duration;

use medibot_core::session::SessionStore;
use medibot_types::chat::{SessionData, SessionId};
use medibot_types::config::{SessionBackendKind, SessionConfig};
use medibot_types::error::RepositoryError;
use tracing::info;

use crate::sqlite::pool::{DatabasePool, database_url};
use crate::sqlite::session::SqliteSessionStore;

use self::memory::InMemorySessionStore;

pub enum SessionBackend {
    Memory(InMemorySessionStore),
    Sqlite(SqliteSessionStore),
}

impl SessionBackend {
    /// Build the backend named by the configuration.
    pub async fn from_config(config: &SessionConfig) -> Result<Self, RepositoryError> {
        let idle_timeout = Duration::from_secs(config.idle_timeout_secs);
        match config.backend {
            SessionBackendKind::Memory => {
                info!("using in-memory session store");
                Ok(Self::Memory(InMemorySessionStore::new(idle_timeout)))
            }
            SessionBackendKind::Sqlite => {
                info!(path = %config.sqlite_path, "using SQLite session store");
                let pool = DatabasePool::new(&database_url(&config.sqlite_path))
                    .await
                    .map_err(|e| RepositoryError::Query(format!("failed to open session database: {e}")))?;
                Ok(Self::Sqlite(SqliteSessionStore::new(pool, idle_timeout)))
            }
        }
    }

    /// Drop idle sessions. Returns how many were removed.
    pub async fn purge_expired(&self) -> Result<u64, RepositoryError> {
        match self {
            Self::Memory(store) => Ok(store.purge_expired() as u64),
            Self::Sqlite(store) => store.purge_expired().await,
        }
    }
}

impl SessionStore for SessionBackend {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, RepositoryError> {
        match self {
            Self::Memory(store) => store.load(id).await,
            Self::Sqlite(store) => store.load(id).await,
        }
    }

    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(store) => store.save(id, data).await,
            Self::Sqlite(store) => store.save(id, data).await,
        }
    }

    async fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(store) => store.remove(id).await,
            Self::Sqlite(store) => store.remove(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_from_default_config() {
        let backend = SessionBackend::from_config(&SessionConfig::default())
            .await
            .unwrap();
        assert!(matches!(backend, SessionBackend::Memory(_)));

        let id = SessionId::new();
        backend.save(&id, &SessionData::default()).await.unwrap();
        assert!(backend.load(&id).await.unwrap().is_some());
        assert_eq!(backend.purge_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sqlite_backend_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            backend: SessionBackendKind::Sqlite,
            sqlite_path: dir.path().join("sessions.db").display().to_string(),
            ..SessionConfig::default()
        };
        let backend = SessionBackend::from_config(&config).await.unwrap();
        assert!(matches!(backend, SessionBackend::Sqlite(_)));

        let id = SessionId::new();
        backend.save(&id, &SessionData::default()).await.unwrap();
        assert_eq!(
            backend.load(&id).await.unwrap(),
            Some(SessionData::default())
        );
        backend.remove(&id).await.unwrap();
        assert!(backend.load(&id).await.unwrap().is_none());
    }
}
