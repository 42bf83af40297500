//! PostgreSQL Property Store
//!
//! Reads the property table through a pooled sqlx connection.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use super::PropertyStore;
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::models::Property;

/// PostgreSQL connection settings
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Table holding the property rows
    pub table: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// How long to wait for a pooled connection
    pub acquire_timeout: Duration,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            table: "properties_property".to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    /// Builds the settings from the service config, None without `DATABASE_URL`.
    pub fn from_config(config: &Config) -> Option<Self> {
        let url = config.database_url.as_ref()?;
        Some(Self {
            url: url.clone(),
            table: config.properties_table.clone(),
            max_connections: config.database_max_connections,
            acquire_timeout: config.store_timeout,
        })
    }
}

/// Property store backed by a PostgreSQL table.
pub struct PostgresPropertyStore {
    pool: PgPool,
    table: String,
}

impl fmt::Debug for PostgresPropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresPropertyStore")
            .field("table", &self.table)
            .finish()
    }
}

impl PostgresPropertyStore {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_identifier(&table)?;
        Ok(Self { pool, table })
    }

    /// Opens a connection pool.
    ///
    /// The pool connects lazily, so the service starts even while the database
    /// is down; queries then fail and are degraded by the caller.
    pub fn connect_lazy(config: &PostgresConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy(&config.url)
            .map_err(|e| ServiceError::Config(format!("Invalid DATABASE_URL: {}", e)))?;

        Self::new(pool, config.table.clone())
    }

    /// Creates the property table when missing.
    pub async fn ensure_table(&self) -> Result<()> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                description TEXT NOT NULL,
                price NUMERIC(12, 2) NOT NULL CHECK (price >= 0),
                location VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::StoreUnavailable(format!("Failed to create table: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl PropertyStore for PostgresPropertyStore {
    async fn query_all(&self, fields: &[&str]) -> Result<Vec<Property>> {
        let query = select_query(&self.table, fields)?;

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ServiceError::StoreUnavailable(format!("Failed to list properties: {}", e)))?;

        rows.iter().map(property_from_row).collect()
    }
}

/// `SELECT <fields> FROM <table> ORDER BY id`, rejecting anything that is not
/// a plain identifier.
fn select_query(table: &str, fields: &[&str]) -> Result<String> {
    if fields.is_empty() {
        return Err(ServiceError::InvalidRequest(
            "At least one field must be selected".to_string(),
        ));
    }
    validate_identifier(table)?;
    for field in fields {
        validate_identifier(field)?;
    }
    Ok(format!(
        "SELECT {} FROM {} ORDER BY id",
        fields.join(", "),
        table
    ))
}

fn validate_identifier(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= 63
        && name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ServiceError::InvalidRequest(format!(
            "Invalid SQL identifier '{}'",
            name
        )))
    }
}

fn property_from_row(row: &PgRow) -> Result<Property> {
    let decode = |e: sqlx::Error| {
        ServiceError::StoreUnavailable(format!("Failed to decode property row: {}", e))
    };

    Ok(Property {
        id: row.try_get::<i64, _>("id").map_err(decode)?,
        title: row.try_get::<String, _>("title").map_err(decode)?,
        description: row.try_get::<String, _>("description").map_err(decode)?,
        price: row.try_get::<BigDecimal, _>("price").map_err(decode)?,
        location: row.try_get::<String, _>("location").map_err(decode)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(decode)?,
    })
}
