//! In-Memory Cache Client
//!
//! Shares a `CacheStore` behind a tokio `RwLock` and exposes it through the
//! `CacheClient` trait, reporting statistics under Redis field names.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::info::{
    CacheInfo, EVICTED_KEYS, EXPIRED_KEYS, KEYSPACE_HITS, KEYSPACE_MISSES, MAX_MEMORY,
    UPTIME_IN_SECONDS, USED_MEMORY,
};
use super::{CacheClient, CacheStore};
use crate::config::Config;
use crate::error::{Result, ServiceError};

/// Process-local cache client. Clones share the same store.
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl InMemoryCache {
    /// Creates a cache bounded by entry count and bytes (0 = unbounded).
    pub fn new(max_entries: usize, max_memory: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries, max_memory))),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_max_entries, config.cache_max_memory)
    }

    /// Remaining lifetime of `key`, None when absent or without TTL.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        self.store.read().await.ttl(key)
    }

    /// Drops every expired entry, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }
}

#[async_trait]
impl CacheClient for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // Write lock: reads update LRU order and hit/miss counters
        let mut store = self.store.write().await;
        Ok(store.get(key))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        if ttl_seconds == 0 {
            return Err(ServiceError::InvalidRequest(
                "TTL must be at least one second".to_string(),
            ));
        }
        let mut store = self.store.write().await;
        store.set(
            key.to_string(),
            value.to_string(),
            Some(Duration::from_secs(ttl_seconds)),
        )
    }

    async fn info(&self) -> Result<CacheInfo> {
        let store = self.store.read().await;
        let stats = store.stats();

        let mut info = CacheInfo::new();
        info.insert(KEYSPACE_HITS, stats.hits);
        info.insert(KEYSPACE_MISSES, stats.misses);
        info.insert(EVICTED_KEYS, stats.evictions);
        info.insert(EXPIRED_KEYS, stats.expired);
        info.insert(USED_MEMORY, store.used_memory());
        info.insert(MAX_MEMORY, store.max_memory());
        info.insert(UPTIME_IN_SECONDS, store.uptime().as_secs());
        Ok(info)
    }

    async fn dbsize(&self) -> Result<u64> {
        Ok(self.store.read().await.len() as u64)
    }
}
