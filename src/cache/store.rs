//! Cache Store Module
//!
//! In-process cache engine combining HashMap storage with LRU tracking, TTL
//! expiration and optional memory accounting.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH};
use crate::error::{Result, ServiceError};

// == Cache Store ==
/// Bounded key/value storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Maximum bytes of keys plus values, 0 = unbounded
    max_memory: u64,
    /// Bytes of keys plus values currently stored
    used_memory: u64,
    started_at: Instant,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `max_memory` - Byte bound on stored keys and values (0 = unbounded)
    pub fn new(max_entries: usize, max_memory: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            max_memory,
            used_memory: 0,
            started_at: Instant::now(),
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// An existing value under the same key is replaced and its TTL reset.
    /// Least recently used entries are evicted until both bounds hold.
    pub fn set(&mut self, key: String, value: String, ttl: Option<Duration>) -> Result<()> {
        self.set_at(key, value, ttl, Instant::now())
    }

    pub(crate) fn set_at(
        &mut self,
        key: String,
        value: String,
        ttl: Option<Duration>,
        now: Instant,
    ) -> Result<()> {
        if key.is_empty() {
            return Err(ServiceError::InvalidRequest("Key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(ServiceError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if self.max_entries == 0 {
            return Err(ServiceError::InvalidRequest(
                "Cache capacity is zero".to_string(),
            ));
        }

        let entry = CacheEntry::new(value, ttl, now);
        let footprint = entry.footprint(&key);
        if self.max_memory > 0 && footprint > self.max_memory {
            return Err(ServiceError::InvalidRequest(format!(
                "Entry of {} bytes exceeds cache memory of {} bytes",
                footprint, self.max_memory
            )));
        }

        // Overwrites release the old footprint before bounds are checked
        self.remove_entry(&key);

        while self.entries.len() >= self.max_entries
            || (self.max_memory > 0 && self.used_memory + footprint > self.max_memory)
        {
            if !self.evict_lru() {
                break;
            }
        }

        self.used_memory += footprint;
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);

        Ok(())
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Expired entries are removed on access and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn get_at(&mut self, key: &str, now: Instant) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expired(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == TTL ==
    /// Remaining lifetime of a live key, None when absent or without TTL.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.ttl_at(key, Instant::now())
    }

    pub(crate) fn ttl_at(&self, key: &str, now: Instant) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .and_then(|entry| entry.ttl_remaining_at(now))
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        self.cleanup_expired_at(Instant::now())
    }

    pub(crate) fn cleanup_expired_at(&mut self, now: Instant) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expired(expired_keys.len() as u64);
        expired_keys.len()
    }

    // == Accessors ==
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn used_memory(&self) -> u64 {
        self.used_memory
    }

    pub fn max_memory(&self) -> u64 {
        self.max_memory
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    // == Internals ==
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.used_memory = self.used_memory.saturating_sub(entry.footprint(key));
        self.lru.remove(key);
        Some(entry)
    }

    fn evict_lru(&mut self) -> bool {
        match self.lru.evict_oldest() {
            Some(key) => {
                if let Some(entry) = self.entries.remove(&key) {
                    self.used_memory = self.used_memory.saturating_sub(entry.footprint(&key));
                }
                self.stats.record_eviction();
                true
            }
            None => false,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Option<Duration> = Some(Duration::from_secs(3600));

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100, 0);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.used_memory(), 0);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100, 0);

        store.set("key1".to_string(), "value1".to_string(), HOUR).unwrap();

        assert_eq!(store.get("key1").as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.used_memory(), 10);
    }

    #[test]
    fn test_store_get_nonexistent_counts_miss() {
        let mut store = CacheStore::new(100, 0);

        assert!(store.get("nonexistent").is_none());
        assert_eq!(store.stats().misses, 1);
        assert_eq!(store.stats().hits, 0);
    }

    #[test]
    fn test_store_overwrite_replaces_footprint() {
        let mut store = CacheStore::new(100, 0);

        store.set("key1".to_string(), "value1".to_string(), None).unwrap();
        store.set("key1".to_string(), "v2".to_string(), None).unwrap();

        assert_eq!(store.get("key1").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.used_memory(), 6);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100, 0);
        let now = Instant::now();

        store
            .set_at("key1".to_string(), "value1".to_string(), Some(Duration::from_secs(1)), now)
            .unwrap();

        assert!(store.get_at("key1", now).is_some());
        assert!(store.get_at("key1", now + Duration::from_secs(2)).is_none());

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expired, 1);
        assert!(store.is_empty());
        assert_eq!(store.used_memory(), 0);
    }

    #[test]
    fn test_store_ttl_remaining() {
        let mut store = CacheStore::new(100, 0);
        let now = Instant::now();

        store.set_at("key1".to_string(), "v".to_string(), HOUR, now).unwrap();
        store.set_at("forever".to_string(), "v".to_string(), None, now).unwrap();

        assert_eq!(store.ttl_at("key1", now), Some(Duration::from_secs(3600)));
        assert_eq!(store.ttl_at("key1", now + Duration::from_secs(3600)), None);
        assert_eq!(store.ttl_at("forever", now), None);
        assert_eq!(store.ttl_at("missing", now), None);
    }

    #[test]
    fn test_store_lru_eviction_by_entries() {
        let mut store = CacheStore::new(3, 0);

        store.set("key1".to_string(), "value1".to_string(), None).unwrap();
        store.set("key2".to_string(), "value2".to_string(), None).unwrap();
        store.set("key3".to_string(), "value3".to_string(), None).unwrap();
        store.get("key1").unwrap();
        store.set("key4".to_string(), "value4".to_string(), None).unwrap();

        assert_eq!(store.len(), 3);
        assert!(store.get("key2").is_none());
        assert!(store.get("key1").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_eviction_by_memory() {
        // Each entry is 2 + 8 = 10 bytes
        let mut store = CacheStore::new(100, 25);

        store.set("k1".to_string(), "aaaaaaaa".to_string(), None).unwrap();
        store.set("k2".to_string(), "bbbbbbbb".to_string(), None).unwrap();
        store.set("k3".to_string(), "cccccccc".to_string(), None).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.used_memory() <= 25);
        assert!(store.get("k1").is_none());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_entry_larger_than_memory() {
        let mut store = CacheStore::new(100, 8);

        let result = store.set("key".to_string(), "x".repeat(16), None);
        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(100, 0);
        let now = Instant::now();

        store
            .set_at("short".to_string(), "v".to_string(), Some(Duration::from_secs(1)), now)
            .unwrap();
        store.set_at("long".to_string(), "v".to_string(), HOUR, now).unwrap();

        let removed = store.cleanup_expired_at(now + Duration::from_secs(5));
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().expired, 1);
        assert!(store.get_at("long", now + Duration::from_secs(5)).is_some());
    }

    #[test]
    fn test_store_key_limits() {
        let mut store = CacheStore::new(100, 0);

        let result = store.set("x".repeat(MAX_KEY_LENGTH + 1), "value".to_string(), None);
        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));

        let result = store.set(String::new(), "value".to_string(), None);
        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
    }

    #[test]
    fn test_store_zero_capacity() {
        let mut store = CacheStore::new(0, 0);
        let result = store.set("key".to_string(), "value".to_string(), None);
        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
    }
}
