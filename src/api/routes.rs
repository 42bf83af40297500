//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{cache_metrics_handler, health_handler, properties_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /properties/` - Property listing through the cache
/// - `GET /cache-metrics/` - Cache health summary
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: read-only endpoints, any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/properties/", get(properties_handler))
        .route("/cache-metrics/", get(cache_metrics_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use crate::config::Config;
    use crate::store::InMemoryPropertyStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let state = AppState::from_config(
            &Config::default(),
            Arc::new(InMemoryCache::new(100, 0)),
            Arc::new(InMemoryPropertyStore::default()),
        );
        create_router(state)
    }

    async fn status_of(uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_properties_endpoint() {
        assert_eq!(status_of("/properties/").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cache_metrics_endpoint() {
        assert_eq!(status_of("/cache-metrics/").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(status_of("/properties/42").await, StatusCode::NOT_FOUND);
    }
}
