//! Cache Statistics Module
//!
//! Raw counters kept by the in-memory engine. Ratios are derived elsewhere,
//! from whatever a cache client reports through `info()`.

// == Cache Stats ==
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped to respect the entry or memory bound
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed
    pub expired: u64,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Recording ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expired(&mut self, count: u64) {
        self.expired += count;
    }
}
