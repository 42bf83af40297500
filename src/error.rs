//! Error types for the property cache service
//!
//! Provides unified error handling using thiserror. None of these errors reach
//! HTTP clients: the services absorb them and degrade to empty or zeroed results.

use thiserror::Error;

// == Service Error Enum ==
/// Unified error type for cache and store collaborators.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Backing store query failed or timed out
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Cache client failed on get/set/info/dbsize or timed out
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// A stored snapshot could not be deserialized
    #[error("Malformed cached data: {0}")]
    MalformedCachedData(String),

    /// Input rejected by the in-memory cache (key or value limits)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Startup configuration problem
    #[error("Configuration error: {0}")]
    Config(String),
}

// == Result Type Alias ==
/// Convenience Result type for the property cache service.
pub type Result<T> = std::result::Result<T, ServiceError>;
