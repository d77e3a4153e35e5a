//! In-process cache backend
//!
//! Shares a `CacheStore` behind an async lock so it can serve concurrent
//! requests and be swept by the cleanup task.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheLayer, CacheStats, CacheStore};
use crate::error::CacheError;

/// `CacheLayer` over a shared in-memory `CacheStore`.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries))),
        }
    }

    /// Drops every expired entry. Returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    /// Returns true if a live entry exists. Does not count as a lookup.
    pub async fn contains(&self, key: &str) -> bool {
        self.store.read().await.contains(key)
    }

    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        self.store.read().await.ttl(key)
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}

#[async_trait]
impl CacheLayer for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        // Write lock: a read updates LRU order and stats
        Ok(self.store.write().await.get(key))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.store
            .write()
            .await
            .set(key.to_string(), value.to_vec(), ttl)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.delete(key);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
