//! TTL Cleanup Task
//!
//! Background sweep for the in-memory cache backend. Expired entries are
//! already invisible to readers; the sweep only reclaims their memory.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a task that removes expired entries from `cache` every
/// `cleanup_interval_secs` seconds.
///
/// The returned handle is aborted during graceful shutdown.
pub fn spawn_cleanup_task(cache: MemoryCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;
            sweep(&cache).await;
        }
    })
}

/// One cleanup pass: removes expired entries and logs the cache counters.
async fn sweep(cache: &MemoryCache) -> usize {
    let removed = cache.cleanup_expired().await;

    if removed > 0 {
        info!("TTL cleanup: removed {} expired entries", removed);
    } else {
        debug!("TTL cleanup: no expired entries found");
    }

    let stats = cache.stats().await;
    debug!(
        "Cache stats: entries={}, hits={}, misses={}, hit_rate={:.2}, evictions={}, invalidations={}",
        stats.total_entries,
        stats.hits,
        stats.misses,
        stats.hit_rate(),
        stats.evictions,
        stats.invalidations
    );

    removed
}
