//! Cache-Aside Coordinator
//!
//! Reads consult the cache first and fill it from the store on a miss. Writes
//! go to the store first and then delete every key the write could have made
//! stale. The cache is best-effort throughout: any cache failure degrades to a
//! miss (reads) or a skipped delete (writes), never to a failed request.
//!
//! Nothing here closes the classic cache-aside race: a reader that loaded from
//! the store just before a concurrent write may repopulate a key right after
//! the writer deleted it. Such an entry is stale for at most its TTL.

mod invalidation;


pub use invalidation::WriteKind;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{keys, CacheLayer};
use crate::config::Config;
use crate::error::{ApiError, Result, StoreError};
use crate::models::{NewUser, User, UserChanges};
use crate::store::UserStore;

/// Per-endpoint lifetimes of cached payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Lifetime of `cache:/api/users`
    pub list_ttl: Duration,
    /// Lifetime of `cache:/api/users/{id}`
    pub user_ttl: Duration,
}

impl CachePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            list_ttl: config.list_ttl(),
            user_ttl: config.user_ttl(),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            list_ttl: Duration::from_secs(60),
            user_ttl: Duration::from_secs(120),
        }
    }
}

/// Where a read's payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    Cache,
    Store,
}

/// Serialized JSON response body, exactly as stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPayload {
    bytes: Vec<u8>,
    source: PayloadSource,
}

impl JsonPayload {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn source(&self) -> PayloadSource {
        self.source
    }

    pub fn is_cache_hit(&self) -> bool {
        self.source == PayloadSource::Cache
    }
}

/// Wraps user reads with cache population and user writes with invalidation.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn UserStore>,
    cache: Arc<dyn CacheLayer>,
    policy: CachePolicy,
}

impl CacheAside {
    pub fn new(store: Arc<dyn UserStore>, cache: Arc<dyn CacheLayer>, policy: CachePolicy) -> Self {
        Self {
            store,
            cache,
            policy,
        }
    }

    // == Reads ==

    /// GET /api/users
    pub async fn list_users(&self) -> Result<JsonPayload> {
        self.read_through(&keys::users_list(), self.policy.list_ttl, || {
            self.store.list()
        })
        .await
    }

    /// GET /api/users/:id
    pub async fn get_user(&self, id: i64) -> Result<JsonPayload> {
        self.read_through(&keys::user(id), self.policy.user_ttl, || self.store.get(id))
            .await
    }

    /// Serves `key` from the cache, or runs `load`, caches its serialized
    /// result for `ttl` and returns it.
    ///
    /// Only successful loads are cached; a load error is returned untouched
    /// and leaves the key absent.
    pub async fn read_through<T, F, Fut>(&self, key: &str, ttl: Duration, load: F) -> Result<JsonPayload>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, StoreError>>,
    {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => {
                debug!("Cache hit for '{}'", key);
                return Ok(JsonPayload {
                    bytes,
                    source: PayloadSource::Cache,
                });
            }
            Ok(None) => debug!("Cache miss for '{}'", key),
            Err(e) => warn!(
                "Cache lookup for '{}' failed on {} backend, reading store: {}",
                key,
                self.cache.backend(),
                e
            ),
        }

        let value = load().await?;
        let bytes = serde_json::to_vec(&value)
            .map_err(|e| ApiError::Internal(format!("Failed to encode response: {}", e)))?;

        match self.cache.set(key, &bytes, ttl).await {
            Ok(()) => debug!("Cached '{}' for {}s", key, ttl.as_secs()),
            Err(e) => warn!("Failed to populate '{}': {}", key, e),
        }

        Ok(JsonPayload {
            bytes,
            source: PayloadSource::Store,
        })
    }

    // == Writes ==

    /// POST /api/users
    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        let created = self.store.create(user).await?;
        self.invalidate(WriteKind::Created).await;
        Ok(created)
    }

    /// Fails with NotFound unless `id` exists in the store. The cache is not
    /// consulted, so a stale entry cannot vouch for a deleted user.
    pub async fn require_user(&self, id: i64) -> Result<()> {
        self.store.get(id).await?;
        Ok(())
    }

    /// PUT /api/users/:id
    pub async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User> {
        let updated = self.store.update(id, changes).await?;
        self.invalidate(WriteKind::Updated(id)).await;
        Ok(updated)
    }

    /// DELETE /api/users/:id
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.store.delete(id).await?;
        self.invalidate(WriteKind::Deleted(id)).await;
        Ok(())
    }

    /// Deletes every key made stale by `write`.
    ///
    /// Failures are logged and dropped; the affected key stays readable until
    /// its TTL runs out.
    pub async fn invalidate(&self, write: WriteKind) {
        for key in write.stale_keys() {
            match self.cache.delete(&key).await {
                Ok(()) => debug!("Invalidated '{}' after {:?}", key, write),
                Err(e) => warn!(
                    "Failed to invalidate '{}' after {:?}, stale until TTL: {}",
                    key, write, e
                ),
            }
        }
    }
}

impl std::fmt::Debug for CacheAside {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAside")
            .field("cache", &self.cache.backend())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
