//! API Module
//!
//! HTTP handlers and routing for the property cache service.
//!
//! # Endpoints
//! - `GET /properties/` - Property listing through the cache
//! - `GET /cache-metrics/` - Cache health summary
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
