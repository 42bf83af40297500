//! Property Cache - cache-aside property listing service
//!
//! Serves the property collection from a cache, falling back to the backing
//! store on a miss, and reports the cache's health metrics.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use services::{CacheMetricsService, PropertyCacheService};
pub use tasks::spawn_cleanup_task;
