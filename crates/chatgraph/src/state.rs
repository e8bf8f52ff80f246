//! Application state wiring.
//!
//! Builds the group service on top of the storage and cache backends
//! selected at compile time via feature flags.

use std::sync::Arc;

use chatgraph_core::cache::Cache;
use chatgraph_core::storage::SocialStore;

use crate::config::Config;
use crate::service::GroupService;

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'sqlite'");

// Cache features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!("Cannot enable both 'memory' and 'redis' cache features");

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!("Must enable exactly one cache feature: 'memory' or 'redis'");

/// Shared application state.
///
/// Cloned per caller; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub groups: Arc<GroupService>,
}

impl AppState {
    fn build(store: Arc<dyn SocialStore>, cache: Arc<dyn Cache>, config: &Config) -> Self {
        let groups = Arc::new(GroupService::new(
            store,
            cache,
            config.cache_ttl(),
            config.invalidation_max_passes,
        ));
        Self { groups }
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::storage::InMemoryStore;

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        /// Useful for testing without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(InMemoryStore::new());
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));

            Ok(Self::build(store, cache, config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::redis_impl::RedisCache;
    use crate::storage::InMemoryStore;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(InMemoryStore::new());
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            Ok(Self::build(store, cache, config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::storage::SqliteStore;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(SqliteStore::new(&config.sqlite_path).await?);
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));

            Ok(Self::build(store, cache, config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::redis_impl::RedisCache;
    use crate::storage::SqliteStore;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(SqliteStore::new(&config.sqlite_path).await?);
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            Ok(Self::build(store, cache, config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_feature_state_builds() {
        let config = Config::default();

        let state = AppState::new(&config).await.expect("state should build");
        let outcome = state.groups.load_my_group("u-nobody").await;

        assert!(outcome.is_success());
        assert_eq!(outcome.payload, Some(Vec::new()));
    }
}
