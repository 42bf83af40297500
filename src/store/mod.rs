//! Backing Store Module
//!
//! The authoritative source of properties, consumed through `PropertyStore`.

mod memory;
mod postgres;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Property;

pub use memory::InMemoryPropertyStore;
pub use postgres::{PostgresConfig, PostgresPropertyStore};

/// The projected field set. Changing it requires bumping the cache key version.
pub const PROPERTY_FIELDS: [&str; 6] = [
    "id",
    "title",
    "description",
    "price",
    "location",
    "created_at",
];

// == Property Store ==
#[async_trait]
pub trait PropertyStore: Send + Sync + Debug {
    /// Fetches every property, projected to `fields`.
    ///
    /// Fails with `ServiceError::StoreUnavailable` when the store cannot answer.
    async fn query_all(&self, fields: &[&str]) -> Result<Vec<Property>>;
}
