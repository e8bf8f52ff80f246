//! Best-effort cache access for read-through queries.
//!
//! The cache is an optimization, never an authority. Any cache failure
//! is logged and the caller proceeds as if the entry were absent.

use std::time::Duration;

use chatgraph_core::cache::Cache;

/// Reads a cache entry. Errors count as a miss.
pub(crate) async fn cache_get(cache: &dyn Cache, key: &str) -> Option<Vec<u8>> {
    match cache.get(key).await {
        Ok(Some(bytes)) => {
            tracing::trace!(key, "cache hit");
            Some(bytes)
        }
        Ok(None) => {
            tracing::trace!(key, "cache miss");
            None
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "cache read failed, falling back to store");
            None
        }
    }
}

/// Populates a cache entry. Errors are logged and swallowed.
pub(crate) async fn cache_put(cache: &dyn Cache, key: &str, bytes: &[u8], ttl: Duration) {
    if let Err(err) = cache.set(key, bytes, Some(ttl)).await {
        tracing::warn!(key, error = %err, "cache write failed, serving from store only");
    }
}
