//! Cache Metrics Service
//!
//! Derives a health summary from the cache client's own counters.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use super::bounded;
use crate::cache::info::{
    CacheInfo, KEYSPACE_HITS, KEYSPACE_MISSES, MAX_MEMORY, UPTIME_IN_SECONDS, USED_MEMORY,
};
use crate::cache::CacheClient;
use crate::models::CacheMetricsSnapshot;

#[derive(Debug, Clone)]
pub struct CacheMetricsService {
    cache: Arc<dyn CacheClient>,
    timeout: Duration,
}

impl CacheMetricsService {
    pub fn new(cache: Arc<dyn CacheClient>, timeout: Duration) -> Self {
        Self { cache, timeout }
    }

    // == Get Cache Metrics ==
    /// Queries the cache once and summarizes it.
    ///
    /// Never fails: if `info()` errors or times out, the snapshot is zeroed and
    /// carries the reason in `error`. Missing optional fields read as 0.
    pub async fn get_cache_metrics(&self) -> CacheMetricsSnapshot {
        let info = match bounded(self.timeout, self.cache.info()).await {
            Some(Ok(info)) => info,
            Some(Err(e)) => {
                error!("Failed to read cache info: {}", e);
                return CacheMetricsSnapshot::unavailable(e.to_string());
            }
            None => {
                error!("Cache info timed out after {:?}", self.timeout);
                return CacheMetricsSnapshot::unavailable(format!(
                    "Cache info timed out after {:?}",
                    self.timeout
                ));
            }
        };

        let total_keys = self.key_count().await;
        summarize(&info, total_keys)
    }

    async fn key_count(&self) -> u64 {
        match bounded(self.timeout, self.cache.dbsize()).await {
            Some(Ok(count)) => count,
            Some(Err(e)) => {
                warn!("Failed to read cache key count: {}", e);
                0
            }
            None => {
                warn!("Cache key count timed out after {:?}", self.timeout);
                0
            }
        }
    }
}

fn summarize(info: &CacheInfo, total_keys: u64) -> CacheMetricsSnapshot {
    let field = |name: &str| info.get_u64(name).unwrap_or(0);

    CacheMetricsSnapshot::new(field(KEYSPACE_HITS), field(KEYSPACE_MISSES))
        .with_memory(field(USED_MEMORY), field(MAX_MEMORY))
        .with_total_keys(total_keys)
        .with_uptime(field(UPTIME_IN_SECONDS))
}
