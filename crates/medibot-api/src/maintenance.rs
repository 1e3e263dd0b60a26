//! Background purge of expired cache entries, stale rate-limit windows and
//! idle sessions.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::state::AppState;

/// How often the maintenance task runs.
pub const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(60);

/// Counts removed by one maintenance pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeReport {
    pub cache_entries: usize,
    pub rate_limit_windows: usize,
    pub sessions: u64,
}

/// Run one purge pass over every store.
pub async fn purge_once(state: &AppState) -> PurgeReport {
    let cache_entries = state.chat_service.cache().purge_expired();
    let rate_limit_windows = state.rate_limiter.purge_expired();
    let sessions = match state.chat_service.sessions().purge_expired().await {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "session purge failed");
            0
        }
    };

    PurgeReport {
        cache_entries,
        rate_limit_windows,
        sessions,
    }
}

/// Start the periodic purge task. It stops when `cancel` fires.
pub fn spawn_maintenance(
    state: AppState,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await; // skip first immediate tick

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let report = purge_once(&state).await;
                    debug!(?report, "maintenance pass complete");
                }
                _ = cancel.cancelled() => {
                    debug!("maintenance task stopped");
                    break;
                }
            }
        }
    })
}
