//! Property Cache Service
//!
//! Cache-aside read of the full property collection.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::bounded;
use crate::cache::CacheClient;
use crate::error::{Result, ServiceError};
use crate::models::{CacheSource, Property};
use crate::store::{PropertyStore, PROPERTY_FIELDS};

/// Cache key of the collection snapshot. The suffix versions the projected
/// field set; bump it whenever `PROPERTY_FIELDS` changes.
pub const PROPERTIES_CACHE_KEY: &str = "all_properties_v2";

/// Lifetime of a cached snapshot.
pub const PROPERTIES_CACHE_TTL_SECS: u64 = 3600;

/// Serves the property collection from the cache, falling back to the store.
///
/// Concurrent misses are not coalesced: each one queries the store and writes
/// the key, and the last write wins.
#[derive(Debug, Clone)]
pub struct PropertyCacheService {
    cache: Arc<dyn CacheClient>,
    store: Arc<dyn PropertyStore>,
    cache_timeout: Duration,
    store_timeout: Duration,
}

impl PropertyCacheService {
    pub fn new(
        cache: Arc<dyn CacheClient>,
        store: Arc<dyn PropertyStore>,
        cache_timeout: Duration,
        store_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            store,
            cache_timeout,
            store_timeout,
        }
    }

    // == Get All Properties ==
    /// Returns every property and where it came from.
    ///
    /// Never fails: an unreachable store yields an empty list (reported as a
    /// miss) and leaves the cache untouched so the next call retries.
    pub async fn get_all_properties(&self) -> (Vec<Property>, CacheSource) {
        match self.read_snapshot().await {
            Ok(Some(properties)) => {
                debug!(
                    "Cache hit for {}: {} properties",
                    PROPERTIES_CACHE_KEY,
                    properties.len()
                );
                return (properties, CacheSource::Hit);
            }
            Ok(None) => info!("Cache miss for {}, fetching from store", PROPERTIES_CACHE_KEY),
            Err(e) => warn!("Treating {} as a miss: {}", PROPERTIES_CACHE_KEY, e),
        }

        let properties = match self.fetch_from_store().await {
            Ok(properties) => properties,
            Err(e) => {
                error!("Failed to load properties: {}", e);
                return (Vec::new(), CacheSource::Miss);
            }
        };

        if let Err(e) = self.write_snapshot(&properties).await {
            warn!("Failed to populate {}: {}", PROPERTIES_CACHE_KEY, e);
        }

        (properties, CacheSource::Miss)
    }

    async fn read_snapshot(&self) -> Result<Option<Vec<Property>>> {
        let raw = bounded(self.cache_timeout, self.cache.get(PROPERTIES_CACHE_KEY))
            .await
            .ok_or_else(|| {
                ServiceError::CacheUnavailable(format!(
                    "get timed out after {:?}",
                    self.cache_timeout
                ))
            })??;

        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| ServiceError::MalformedCachedData(e.to_string())),
            None => Ok(None),
        }
    }

    async fn fetch_from_store(&self) -> Result<Vec<Property>> {
        bounded(self.store_timeout, self.store.query_all(&PROPERTY_FIELDS))
            .await
            .ok_or_else(|| {
                ServiceError::StoreUnavailable(format!(
                    "query timed out after {:?}",
                    self.store_timeout
                ))
            })?
    }

    async fn write_snapshot(&self, properties: &[Property]) -> Result<()> {
        let raw = encode_snapshot(properties)?;

        bounded(
            self.cache_timeout,
            self.cache
                .set(PROPERTIES_CACHE_KEY, &raw, PROPERTIES_CACHE_TTL_SECS),
        )
        .await
        .ok_or_else(|| {
            ServiceError::CacheUnavailable(format!("set timed out after {:?}", self.cache_timeout))
        })?
    }
}

fn encode_snapshot(properties: &[Property]) -> Result<String> {
    serde_json::to_string(properties).map_err(|e| {
        ServiceError::CacheUnavailable(format!("Failed to encode snapshot: {}", e))
    })
}
