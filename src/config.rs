//! Configuration Module
//!
//! Loads service configuration from the environment. An optional `.env` file is
//! read first; every value has a default suited to local development.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which cache backend the coordinator talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Service configuration parameters.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection string
    pub database_url: String,
    /// Redis connection string
    pub redis_url: String,
    /// Signing secret; carried for the surrounding deployment, unused here
    pub secret_key: String,
    /// HTTP server port
    pub server_port: u16,
    pub cache_backend: CacheBackend,
    /// TTL in seconds for `cache:/api/users`
    pub list_cache_ttl: u64,
    /// TTL in seconds for `cache:/api/users/{id}`
    pub user_cache_ttl: u64,
    /// Capacity of the in-memory cache backend
    pub memory_cache_max_entries: usize,
    /// Expiry sweep interval in seconds (in-memory backend only)
    pub cleanup_interval: u64,
    pub db_max_connections: u32,
    /// Seconds to wait for a store or cache connection
    pub connect_timeout: u64,
    /// Insert the default users into an empty table on startup
    pub seed_default_users: bool,
}

impl Config {
    /// Creates a new Config from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` (default: `postgresql://postgres:postgres@db:5432/flask_crud`)
    /// - `REDIS_URL` (default: `redis://redis:6379/0`)
    /// - `SECRET_KEY` (default: `nika-sirius-test`)
    /// - `SERVER_PORT` (default: 5000)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `LIST_CACHE_TTL` (default: 60)
    /// - `USER_CACHE_TTL` (default: 120)
    /// - `MEMORY_CACHE_MAX_ENTRIES` (default: 1000)
    /// - `CLEANUP_INTERVAL` (default: 1)
    /// - `DB_MAX_CONNECTIONS` (default: 10)
    /// - `CONNECT_TIMEOUT` (default: 3)
    /// - `SEED_DEFAULT_USERS` (default: true)
    pub fn from_env() -> Self {
        // A missing .env is the normal case outside local development
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            secret_key: env::var("SECRET_KEY").unwrap_or(defaults.secret_key),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.cache_backend),
            list_cache_ttl: parse_var("LIST_CACHE_TTL").unwrap_or(defaults.list_cache_ttl),
            user_cache_ttl: parse_var("USER_CACHE_TTL").unwrap_or(defaults.user_cache_ttl),
            memory_cache_max_entries: parse_var("MEMORY_CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.memory_cache_max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS")
                .unwrap_or(defaults.db_max_connections),
            connect_timeout: parse_var("CONNECT_TIMEOUT").unwrap_or(defaults.connect_timeout),
            seed_default_users: parse_var("SEED_DEFAULT_USERS")
                .unwrap_or(defaults.seed_default_users),
        }
    }

    pub fn list_ttl(&self) -> Duration {
        Duration::from_secs(self.list_cache_ttl)
    }

    pub fn user_ttl(&self) -> Duration {
        Duration::from_secs(self.user_cache_ttl)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "postgresql://postgres:postgres@db:5432/flask_crud".to_string(),
            redis_url: "redis://redis:6379/0".to_string(),
            secret_key: "nika-sirius-test".to_string(),
            server_port: 5000,
            cache_backend: CacheBackend::Redis,
            list_cache_ttl: 60,
            user_cache_ttl: 120,
            memory_cache_max_entries: 1000,
            cleanup_interval: 1,
            db_max_connections: 10,
            connect_timeout: 3,
            seed_default_users: true,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("redis_url", &self.redis_url)
            .field("secret_key", &"<redacted>")
            .field("server_port", &self.server_port)
            .field("cache_backend", &self.cache_backend)
            .field("list_cache_ttl", &self.list_cache_ttl)
            .field("user_cache_ttl", &self.user_cache_ttl)
            .field("memory_cache_max_entries", &self.memory_cache_max_entries)
            .field("cleanup_interval", &self.cleanup_interval)
            .field("db_max_connections", &self.db_max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .field("seed_default_users", &self.seed_default_users)
            .finish()
    }
}
