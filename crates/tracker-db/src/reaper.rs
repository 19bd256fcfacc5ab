//! Background purge of expired token records

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracker_core::traits::TokenRepository;

/// Periodically delete token records past `expired_at`.
///
/// Reads already ignore expired records, so a missed run only costs disk space.
/// The task runs until the returned handle is aborted.
pub fn spawn_token_reaper(repo: Arc<dyn TokenRepository>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match repo.delete_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::debug!(purged, "Purged expired token records"),
                Err(e) => tracing::warn!(error = %e, "Token reaper run failed"),
            }
        }
    })
}
