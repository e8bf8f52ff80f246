//! Cache key builders.
//!
//! Key spellings are fixed wire contracts shared with other consumers
//! of the same cache; changing any of them orphans live entries.

/// Returns the cache key for the list of groups a user owns.
pub fn my_group_list_key(owner_id: &str) -> String {
    format!("contact_mygroup_list_{}", owner_id)
}

/// Returns the cache key for a group's detail snapshot.
pub fn group_info_key(group_id: &str) -> String {
    format!("group_info_{}", group_id)
}

/// Returns the cache key for a group's member listing.
pub fn group_member_list_key(group_id: &str) -> String {
    format!("group_memberlist_{}", group_id)
}

/// Returns the cache key for a session listing scoped to a group or user.
pub fn group_session_list_key(id: &str) -> String {
    format!("group_session_list_{}", id)
}

/// Returns the cache key for the list of groups a user has joined.
pub fn joined_group_list_key(user_id: &str) -> String {
    format!("my_joined_group_list_{}", user_id)
}

/// Returns the pattern matching every session listing key.
pub fn group_session_list_pattern() -> String {
    "group_session_list*".to_string()
}

/// Returns the pattern matching every joined-group listing key.
pub fn joined_group_list_pattern() -> String {
    "my_joined_group_list*".to_string()
}
