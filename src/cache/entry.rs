//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value and its optional expiry deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Monotonic deadline, None = no expiration
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry whose TTL starts counting at `now`.
    ///
    /// A TTL whose deadline does not fit in an `Instant` never expires.
    pub fn new(value: String, ttl: Option<Duration>, now: Instant) -> Self {
        Self {
            value,
            expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches its deadline.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }

    // == Time To Live ==
    /// Remaining lifetime at `now`; `Some(ZERO)` once expired, None without TTL.
    pub fn ttl_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Bytes accounted against the memory bound for this entry under `key`.
    pub fn footprint(&self, key: &str) -> u64 {
        (key.len() + self.value.len()) as u64
    }
}
