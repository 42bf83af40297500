//! In-Memory Property Store
//!
//! A fixed property list, optionally seeded from a JSON file. Counts queries so
//! callers can observe how often the store was actually reached.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::PropertyStore;
use crate::error::{Result, ServiceError};
use crate::models::Property;

#[derive(Debug, Clone, Default)]
pub struct InMemoryPropertyStore {
    properties: Arc<Vec<Property>>,
    queries: Arc<AtomicUsize>,
}

impl InMemoryPropertyStore {
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            properties: Arc::new(properties),
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Loads a JSON array of properties.
    ///
    /// Fails with `ServiceError::Config` when the file is unreadable, is not a
    /// property array, or lists a negative price.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::Config(format!("Failed to read seed file {}: {}", path.display(), e))
        })?;
        let properties = Self::parse_seed(&raw)?;
        info!(
            "Loaded {} properties from {}",
            properties.len(),
            path.display()
        );
        Ok(Self::new(properties))
    }

    fn parse_seed(raw: &str) -> Result<Vec<Property>> {
        let properties: Vec<Property> = serde_json::from_str(raw)
            .map_err(|e| ServiceError::Config(format!("Invalid property seed: {}", e)))?;

        if let Some(bad) = properties.iter().find(|p| !p.has_valid_price()) {
            return Err(ServiceError::Config(format!(
                "Property {} has a negative price",
                bad.id
            )));
        }
        Ok(properties)
    }

    /// How many times `query_all` has been called.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn query_all(&self, _fields: &[&str]) -> Result<Vec<Property>> {
        // Rows already hold exactly the projected fields
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.properties.as_ref().clone())
    }
}
