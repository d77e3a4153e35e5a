//! User Cache API - user records over HTTP with a cache-aside layer
//!
//! # Startup Sequence
//! 1. Initialize tracing subscriber for logging
//! 2. Load configuration from the environment
//! 3. Connect to PostgreSQL, ensure the schema, seed default users
//! 4. Build the cache backend (Redis, or in-memory with a sweep task)
//! 5. Serve the Axum router until SIGINT/SIGTERM

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_cache_api::api::create_router;
use user_cache_api::cache::{CacheLayer, MemoryCache, RedisCache};
use user_cache_api::config::CacheBackend;
use user_cache_api::store::{PgUserStore, UserStore};
use user_cache_api::{spawn_cleanup_task, AppState, CachePolicy, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info", overridable with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_cache_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting User Cache API");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache={:?}, list_ttl={}s, user_ttl={}s, port={}",
        config.cache_backend, config.list_cache_ttl, config.user_cache_ttl, config.server_port
    );

    let store = PgUserStore::connect(&config)
        .await
        .context("failed to connect to PostgreSQL")?;
    store
        .ensure_schema()
        .await
        .context("failed to create users table")?;
    if config.seed_default_users {
        let seeded = store
            .seed_defaults()
            .await
            .context("failed to seed default users")?;
        if seeded > 0 {
            info!("Seeded {} default users", seeded);
        }
    }

    let (cache, cleanup_handle) = build_cache(&config)?;
    info!("Cache backend '{}' ready", cache.backend());

    let state = AppState::from_parts(
        Arc::new(store.clone()),
        cache,
        CachePolicy::from_config(&config),
    );
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Builds the configured cache backend, plus the sweep task for the in-memory one.
fn build_cache(config: &Config) -> anyhow::Result<(Arc<dyn CacheLayer>, Option<JoinHandle<()>>)> {
    match config.cache_backend {
        CacheBackend::Redis => {
            let cache = RedisCache::new(
                &config.redis_url,
                Duration::from_secs(config.connect_timeout),
            )
            .context("invalid Redis configuration")?;
            Ok((Arc::new(cache), None))
        }
        CacheBackend::Memory => {
            let cache = MemoryCache::new(config.memory_cache_max_entries);
            let handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval);
            Ok((Arc::new(cache), Some(handle)))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweep task.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
