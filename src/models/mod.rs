//! Domain and response models for the property cache service
//!
//! This module defines the property projection, the derived cache metrics
//! snapshot, and the DTOs serialized into HTTP response bodies.

pub mod metrics;
pub mod property;
pub mod responses;

// Re-export commonly used types
pub use metrics::CacheMetricsSnapshot;
pub use property::{CacheSource, Property};
pub use responses::{HealthResponse, PropertyListResponse};
