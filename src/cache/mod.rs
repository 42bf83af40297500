//! Cache Module
//!
//! The Cache Client seam used by the services, plus its two implementations:
//! an in-process TTL/LRU cache and a Redis-backed client.

mod entry;
pub mod info;
mod lru;
mod memory;
mod redis;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use info::CacheInfo;
pub use lru::LruTracker;
pub use memory::InMemoryCache;
pub use redis::RedisCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

// == Cache Client ==
/// Key/value cache with TTL, as consumed by the services.
///
/// Implementations report failures as `ServiceError::CacheUnavailable`; callers
/// decide how to degrade.
#[async_trait]
pub trait CacheClient: Send + Sync + Debug {
    /// Fetches the raw value stored under `key`, None when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` for `ttl_seconds`.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()>;

    /// Administrative statistics (hits, misses, memory, uptime).
    async fn info(&self) -> Result<CacheInfo>;

    /// Number of keys currently held.
    async fn dbsize(&self) -> Result<u64>;
}
