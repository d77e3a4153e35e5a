//! Cache layer contract
//!
//! The coordinator only ever sees this trait, so Redis, the in-process store
//! and test fakes are interchangeable.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;

/// Key/value cache with expiring entries.
///
/// Errors mean "the cache could not answer"; callers treat them as a miss on
/// reads and as a skipped delete on writes.
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Returns the stored bytes, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores `value` under `key`, replacing any previous entry, for `ttl`.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Removes `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
