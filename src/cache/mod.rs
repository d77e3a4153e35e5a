//! Cache Module
//!
//! The cache layer contract, its Redis and in-process backends, and the key
//! scheme shared by readers and invalidators.

mod entry;
pub mod keys;
mod layer;
mod lru;
mod memory;
mod redis;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use layer::CacheLayer;
pub use lru::LruTracker;
pub use memory::MemoryCache;
pub use redis::RedisCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 4 * 1024 * 1024; // 4 MB
