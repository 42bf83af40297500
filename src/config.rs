//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Which Cache Client implementation backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// In-process TTL/LRU cache
    Memory,
    /// Remote Redis server
    Redis,
}

impl CacheBackend {
    /// Parses a backend name, case-insensitively. Unknown names yield None.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "local" => Some(CacheBackend::Memory),
            "redis" => Some(CacheBackend::Redis),
            _ => None,
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Cache Client implementation
    pub cache_backend: CacheBackend,
    /// Redis connection URL, used when `cache_backend` is Redis
    pub redis_url: String,
    /// Maximum number of entries the in-memory cache can hold
    pub cache_max_entries: usize,
    /// Memory bound of the in-memory cache in bytes (0 = unbounded)
    pub cache_max_memory: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// PostgreSQL URL; when absent the in-memory store is used
    pub database_url: Option<String>,
    /// PostgreSQL pool size
    pub database_max_connections: u32,
    /// Table holding the property rows
    pub properties_table: String,
    /// JSON file seeding the in-memory store
    pub properties_seed_file: Option<PathBuf>,
    /// Upper bound on any single cache call
    pub cache_timeout: Duration,
    /// Upper bound on any single store query
    pub store_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `CACHE_MAX_ENTRIES` - In-memory cache entries (default: 1000)
    /// - `CACHE_MAX_MEMORY` - In-memory cache bytes, 0 = unbounded (default: 0)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `DATABASE_URL` - PostgreSQL URL (default: unset, in-memory store)
    /// - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 5)
    /// - `PROPERTIES_TABLE` - Property table name (default: properties_property)
    /// - `PROPERTIES_SEED_FILE` - JSON seed for the in-memory store (default: unset)
    /// - `CACHE_TIMEOUT_MS` - Cache call timeout (default: 2000)
    /// - `STORE_TIMEOUT_MS` - Store query timeout (default: 5000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_backend: env::var("CACHE_BACKEND")
                .ok()
                .and_then(|v| CacheBackend::parse(&v))
                .unwrap_or(defaults.cache_backend),
            redis_url: non_empty_var("REDIS_URL").unwrap_or(defaults.redis_url),
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            cache_max_memory: parse_var("CACHE_MAX_MEMORY").unwrap_or(defaults.cache_max_memory),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            database_url: non_empty_var("DATABASE_URL"),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or(defaults.database_max_connections),
            properties_table: non_empty_var("PROPERTIES_TABLE")
                .unwrap_or(defaults.properties_table),
            properties_seed_file: non_empty_var("PROPERTIES_SEED_FILE").map(PathBuf::from),
            cache_timeout: parse_var("CACHE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.cache_timeout),
            store_timeout: parse_var("STORE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_timeout),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_backend: CacheBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            cache_max_entries: 1000,
            cache_max_memory: 0,
            cleanup_interval: 1,
            database_url: None,
            database_max_connections: 5,
            properties_table: "properties_property".to_string(),
            properties_seed_file: None,
            cache_timeout: Duration::from_millis(2000),
            store_timeout: Duration::from_millis(5000),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
