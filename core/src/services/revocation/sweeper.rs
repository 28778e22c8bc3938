//! Periodic cleanup of expired revocation entries.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::services::revocation::cache::RevocationCache;

/// Spawn the background sweep task.
///
/// Runs [`RevocationCache::sweep`] every `interval` until a value is sent on
/// the `shutdown` channel (or its sender is dropped).
pub fn spawn_sweeper(
    cache: Arc<RevocationCache>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = cache.sweep(Utc::now().timestamp());
                    debug!(removed, remaining = cache.len(), "revocation sweep completed");
                }
                _ = shutdown.changed() => {
                    debug!("revocation sweeper shutting down");
                    break;
                }
            }
        }
    })
}
