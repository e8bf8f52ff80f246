use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in minutes (default: 30)
    pub cache_ttl_minutes: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Maximum list-then-delete passes per invalidation pattern (default: 8)
    pub invalidation_max_passes: usize,
    /// Path to SQLite database file (default: "chatgraph.db")
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_MINUTES` - Cache TTL in minutes (default: 30)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `INVALIDATION_MAX_PASSES` - Invalidation pass cap (default: 8)
    /// - `SQLITE_PATH` - SQLite database path (default: "chatgraph.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> Self {
        Self {
            cache_ttl_minutes: env::var("CACHE_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            invalidation_max_passes: env::var("INVALIDATION_MAX_PASSES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "chatgraph.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes * 60)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
