//! Redis cache backend
//!
//! Connections come from a `deadpool-redis` pool that connects lazily, so a
//! Redis outage at startup or mid-flight only turns cache calls into errors.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{
    redis::AsyncCommands, Config as PoolSettings, Connection, Pool, PoolConfig, Runtime, Timeouts,
};
use tracing::debug;

use crate::cache::CacheLayer;
use crate::error::CacheError;

const DEFAULT_POOL_SIZE: usize = 16;

/// `CacheLayer` over a Redis server.
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    /// Builds a pool for `url`. No connection is attempted until first use.
    ///
    /// `timeout` bounds waiting for, creating and recycling a connection.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let mut settings = PoolSettings::from_url(url);
        let mut pool_config = PoolConfig::new(DEFAULT_POOL_SIZE);
        pool_config.timeouts = Timeouts {
            wait: Some(timeout),
            create: Some(timeout),
            recycle: Some(timeout),
        };
        settings.pool = Some(pool_config);

        let pool = settings
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CacheError::Unavailable(format!("Failed to build Redis pool: {}", e)))?;

        Ok(Self { pool })
    }

    async fn conn(&self) -> Result<Connection, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Unavailable(format!("Failed to get Redis connection: {}", e)))
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisCache")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

#[async_trait]
impl CacheLayer for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn().await?;
        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Unavailable(format!("Failed to get key '{}': {}", key, e)))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        let ttl_secs = setex_seconds(ttl);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| CacheError::Unavailable(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Redis SETEX '{}' ({}s)", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        let removed: i64 = conn.del(key).await.map_err(|e| {
            CacheError::Unavailable(format!("Failed to delete key '{}': {}", key, e))
        })?;

        debug!("Redis DEL '{}' removed {}", key, removed);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

/// SETEX takes whole seconds: the TTL is truncated, with a floor of 1 since 0 is rejected.
fn setex_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}
