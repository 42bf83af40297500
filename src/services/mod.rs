//! Services Module
//!
//! The two read paths the HTTP facade exposes. Both are fail-soft: collaborator
//! errors are logged and turned into empty or zeroed results.

mod metrics;
mod properties;

use std::future::Future;
use std::time::Duration;

pub use metrics::CacheMetricsService;
pub use properties::{PropertyCacheService, PROPERTIES_CACHE_KEY, PROPERTIES_CACHE_TTL_SECS};

/// Runs a collaborator call under `limit`; elapsed calls yield None.
async fn bounded<F: Future>(limit: Duration, call: F) -> Option<F::Output> {
    tokio::time::timeout(limit, call).await.ok()
}
