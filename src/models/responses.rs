//! Response DTOs for the property cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use super::Property;

/// Response body for the property listing (GET /properties/)
#[derive(Debug, Clone, Serialize)]
pub struct PropertyListResponse {
    /// The cache-aside result, possibly empty
    pub data: Vec<Property>,
}

impl PropertyListResponse {
    /// Creates a new PropertyListResponse
    pub fn new(data: Vec<Property>) -> Self {
        Self { data }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
