//! Redis Cache Client
//!
//! Talks to a Redis server through a multiplexed `ConnectionManager`, which
//! reconnects on its own after transient failures.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use super::{CacheClient, CacheInfo};
use crate::error::{Result, ServiceError};

/// Redis-backed cache client. Cheap to clone.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    url: String,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("url", &self.url)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Connects to `url`, giving up after `timeout`.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::open(url).map_err(|e| {
            ServiceError::CacheUnavailable(format!("Failed to create Redis client: {}", e))
        })?;

        let connection = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                ServiceError::CacheUnavailable(format!(
                    "Timed out connecting to Redis after {:?}",
                    timeout
                ))
            })?
            .map_err(|e| {
                ServiceError::CacheUnavailable(format!("Failed to connect to Redis: {}", e))
            })?;

        Ok(Self {
            connection,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl CacheClient for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();

        conn.get::<_, Option<String>>(key).await.map_err(|e| {
            ServiceError::CacheUnavailable(format!("Failed to get key '{}': {}", key, e))
        })
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.connection.clone();

        conn.set_ex::<_, _, ()>(key, value, ttl_seconds.max(1))
            .await
            .map_err(|e| {
                ServiceError::CacheUnavailable(format!("Failed to set key '{}': {}", key, e))
            })
    }

    async fn info(&self) -> Result<CacheInfo> {
        let mut conn = self.connection.clone();

        let raw: String = redis::cmd("INFO")
            .query_async(&mut conn)
            .await
            .map_err(|e| ServiceError::CacheUnavailable(format!("Failed to run INFO: {}", e)))?;

        Ok(CacheInfo::parse(&raw))
    }

    async fn dbsize(&self) -> Result<u64> {
        let mut conn = self.connection.clone();

        redis::cmd("DBSIZE")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                ServiceError::CacheUnavailable(format!("Failed to get database size: {}", e))
            })
    }
}
