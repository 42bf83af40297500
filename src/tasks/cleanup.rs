//! TTL Cleanup Task
//!
//! Periodically purges expired entries so the in-memory cache's memory and key
//! count reflect live data between reads.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::InMemoryCache;

/// Spawns the cleanup loop. Abort the returned handle on shutdown.
///
/// An interval of zero seconds is clamped to one.
pub fn spawn_cleanup_task(cache: InMemoryCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let period = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", period);

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = cache.purge_expired().await;
            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
