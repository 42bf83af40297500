//! API Handlers
//!
//! HTTP request handlers for each endpoint. All of them are infallible: the
//! services already degrade collaborator failures to empty or zeroed bodies.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, Json};

use crate::cache::CacheClient;
use crate::config::Config;
use crate::models::{CacheMetricsSnapshot, HealthResponse, PropertyListResponse};
use crate::services::{CacheMetricsService, PropertyCacheService};
use crate::store::PropertyStore;

/// Response header reporting whether the listing came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub properties: PropertyCacheService,
    pub metrics: CacheMetricsService,
}

impl AppState {
    pub fn new(properties: PropertyCacheService, metrics: CacheMetricsService) -> Self {
        Self {
            properties,
            metrics,
        }
    }

    /// Wires both services to the same cache client.
    pub fn with_collaborators(
        cache: Arc<dyn CacheClient>,
        store: Arc<dyn PropertyStore>,
        cache_timeout: Duration,
        store_timeout: Duration,
    ) -> Self {
        let properties =
            PropertyCacheService::new(cache.clone(), store, cache_timeout, store_timeout);
        let metrics = CacheMetricsService::new(cache, cache_timeout);
        Self::new(properties, metrics)
    }

    /// Same as `with_collaborators`, taking the timeouts from the Config.
    pub fn from_config(
        config: &Config,
        cache: Arc<dyn CacheClient>,
        store: Arc<dyn PropertyStore>,
    ) -> Self {
        Self::with_collaborators(cache, store, config.cache_timeout, config.store_timeout)
    }
}

/// Handler for GET /properties/
///
/// Body is `{"data": [...]}`; the `x-cache` header says HIT or MISS.
pub async fn properties_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (properties, source) = state.properties.get_all_properties().await;

    (
        [(CACHE_STATUS_HEADER, source.as_str())],
        Json(PropertyListResponse::new(properties)),
    )
}

/// Handler for GET /cache-metrics/
pub async fn cache_metrics_handler(State(state): State<AppState>) -> Json<CacheMetricsSnapshot> {
    Json(state.metrics.get_cache_metrics().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
