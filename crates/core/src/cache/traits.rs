use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic cache operations.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Lists every live key matching a pattern (e.g. "my_joined_group_list*").
    ///
    /// The listing is a point-in-time snapshot; keys created or deleted
    /// concurrently may or may not appear.
    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>>;
}
