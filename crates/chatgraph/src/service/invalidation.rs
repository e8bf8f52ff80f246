//! Post-write cache invalidation.
//!
//! Every roster mutation maps to a fixed set of stale cache patterns.
//! Invalidation runs strictly after the store writes and is best
//! effort: failures are logged, never surfaced to callers.

use std::sync::Arc;

use chatgraph_core::cache::{
    group_session_list_key, group_session_list_pattern, joined_group_list_key,
    joined_group_list_pattern, my_group_list_key, Cache,
};

/// Default bound on list-and-delete passes per pattern.
pub const DEFAULT_MAX_PASSES: usize = 8;

/// A store write whose dependent cache entries have gone stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterMutation {
    GroupCreated { owner_id: String },
    MemberEntered { group_id: String },
    MemberLeft { user_id: String },
    MembersRemoved,
    GroupDismissed { owner_id: String },
}

impl RosterMutation {
    /// The cache patterns this mutation invalidates. A pattern is an
    /// exact key or a `*`-terminated prefix.
    pub fn stale_patterns(&self) -> Vec<String> {
        match self {
            RosterMutation::GroupCreated { owner_id } => vec![my_group_list_key(owner_id)],
            RosterMutation::MemberEntered { group_id } => vec![
                group_session_list_key(group_id),
                joined_group_list_key(group_id),
            ],
            RosterMutation::MemberLeft { user_id } => vec![
                group_session_list_key(user_id),
                joined_group_list_key(user_id),
            ],
            RosterMutation::MembersRemoved => {
                vec![group_session_list_pattern(), joined_group_list_pattern()]
            }
            RosterMutation::GroupDismissed { owner_id } => vec![
                my_group_list_key(owner_id),
                group_session_list_key(owner_id),
                joined_group_list_pattern(),
            ],
        }
    }
}

/// Deletes stale cache entries after roster mutations.
#[derive(Clone)]
pub struct Invalidator {
    cache: Arc<dyn Cache>,
    max_passes: usize,
}

impl Invalidator {
    /// `max_passes` bounds the list-and-delete loop per pattern so a
    /// writer racing the purge cannot pin it forever.
    pub fn new(cache: Arc<dyn Cache>, max_passes: usize) -> Self {
        Self { cache, max_passes }
    }

    /// Purges every pattern the mutation staled.
    pub async fn invalidate(&self, mutation: &RosterMutation) {
        for pattern in mutation.stale_patterns() {
            self.purge_pattern(&pattern).await;
        }
    }

    async fn purge_pattern(&self, pattern: &str) {
        for _ in 0..self.max_passes {
            let keys = match self.cache.keys_matching(pattern).await {
                Ok(keys) => keys,
                Err(err) => {
                    tracing::warn!(pattern, error = %err, "listing stale cache keys failed");
                    return;
                }
            };
            if keys.is_empty() {
                return;
            }
            for key in keys {
                if let Err(err) = self.cache.delete(&key).await {
                    tracing::warn!(key, error = %err, "deleting stale cache key failed");
                }
            }
        }
        tracing::warn!(
            pattern,
            max_passes = self.max_passes,
            "invalidation pass budget exhausted, stale entries may remain"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chatgraph_core::cache::{CacheError, Result};

    use crate::cache::memory::MemoryCache;

    /// A cache whose `keys_matching` always reports one remaining key,
    /// as if another writer kept repopulating it.
    struct ChurningCache {
        list_calls: AtomicUsize,
    }

    #[async_trait]
    impl Cache for ChurningCache {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _key: &str) -> Result<()> {
            Ok(())
        }

        async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![pattern.trim_end_matches('*').to_string()])
        }
    }

    /// A cache where every operation fails.
    struct BrokenCache;

    #[async_trait]
    impl Cache for BrokenCache {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> Result<()> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn delete(&self, _key: &str) -> Result<()> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn keys_matching(&self, _pattern: &str) -> Result<Vec<String>> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }
    }

    #[test]
    fn test_member_entered_stales_group_scoped_keys() {
        let mutation = RosterMutation::MemberEntered {
            group_id: "G12345678901".to_string(),
        };

        assert_eq!(
            mutation.stale_patterns(),
            vec![
                "group_session_list_G12345678901".to_string(),
                "my_joined_group_list_G12345678901".to_string(),
            ]
        );
    }

    #[test]
    fn test_members_removed_stales_whole_prefixes() {
        assert_eq!(
            RosterMutation::MembersRemoved.stale_patterns(),
            vec![
                "group_session_list*".to_string(),
                "my_joined_group_list*".to_string(),
            ]
        );
    }

    #[test]
    fn test_group_dismissed_stales_owner_keys_and_joined_prefix() {
        let mutation = RosterMutation::GroupDismissed {
            owner_id: "u-1".to_string(),
        };

        assert_eq!(
            mutation.stale_patterns(),
            vec![
                "contact_mygroup_list_u-1".to_string(),
                "group_session_list_u-1".to_string(),
                "my_joined_group_list*".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalidate_deletes_matching_entries() {
        let cache = Arc::new(MemoryCache::new(64));
        cache.set("group_session_list_u-1", b"a", None).await.unwrap();
        cache.set("my_joined_group_list_u-1", b"b", None).await.unwrap();
        cache.set("group_info_G1", b"c", None).await.unwrap();

        let invalidator = Invalidator::new(cache.clone(), DEFAULT_MAX_PASSES);
        invalidator
            .invalidate(&RosterMutation::MemberLeft {
                user_id: "u-1".to_string(),
            })
            .await;

        assert_eq!(cache.get("group_session_list_u-1").await.unwrap(), None);
        assert_eq!(cache.get("my_joined_group_list_u-1").await.unwrap(), None);
        assert!(cache.get("group_info_G1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_prefix_invalidation_sweeps_every_scoped_entry() {
        let cache = Arc::new(MemoryCache::new(64));
        cache.set("group_session_list_u-1", b"a", None).await.unwrap();
        cache.set("group_session_list_G9", b"b", None).await.unwrap();
        cache.set("my_joined_group_list_u-2", b"c", None).await.unwrap();

        let invalidator = Invalidator::new(cache.clone(), DEFAULT_MAX_PASSES);
        invalidator.invalidate(&RosterMutation::MembersRemoved).await;

        assert_eq!(cache.get("group_session_list_u-1").await.unwrap(), None);
        assert_eq!(cache.get("group_session_list_G9").await.unwrap(), None);
        assert_eq!(cache.get("my_joined_group_list_u-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_purge_stops_at_pass_budget_when_keys_keep_reappearing() {
        let cache = Arc::new(ChurningCache {
            list_calls: AtomicUsize::new(0),
        });

        let invalidator = Invalidator::new(cache.clone(), 3);
        invalidator
            .invalidate(&RosterMutation::GroupCreated {
                owner_id: "u-1".to_string(),
            })
            .await;

        assert_eq!(cache.list_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_invalidate_survives_a_broken_cache() {
        let invalidator = Invalidator::new(Arc::new(BrokenCache), DEFAULT_MAX_PASSES);

        // Must return, not panic or error.
        invalidator
            .invalidate(&RosterMutation::GroupDismissed {
                owner_id: "u-1".to_string(),
            })
            .await;
    }
}
