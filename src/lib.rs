//! User Cache API - user records over HTTP with a cache-aside layer
//!
//! PostgreSQL is the system of record; Redis (or an in-process store) holds
//! expiring snapshots of read responses, invalidated explicitly on writes.

pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use coordinator::{CacheAside, CachePolicy};
pub use tasks::spawn_cleanup_task;
