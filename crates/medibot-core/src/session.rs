//! Session storage port.

use medibot_types::chat::{SessionData, SessionId};
use medibot_types::error::RepositoryError;

/// Per-client session persistence keyed by [`SessionId`].
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in medibot-infra.
pub trait SessionStore: Send + Sync {
    /// Load a session. Unknown or expired ids yield `None`.
    fn load(
        &self,
        id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Option<SessionData>, RepositoryError>> + Send;

    /// Persist a session, refreshing its idle timer.
    fn save(
        &self,
        id: &SessionId,
        data: &SessionData,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a session. Removing an unknown id is not an error.
    fn remove(
        &self,
        id: &SessionId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
