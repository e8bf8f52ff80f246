//! Cache key pattern matching.
//!
//! Invalidation patterns use a single convention: an exact key, or a
//! prefix followed by a trailing `*`. In-memory backends match with
//! [`pattern_matches`]; Redis gets the same patterns verbatim, where
//! `KEYS` interprets them identically for this subset of glob syntax.

/// Checks whether `key` matches `pattern`.
///
/// A pattern without `*` matches only the identical key. A pattern
/// ending in `*` matches every key starting with the part before it.
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_pattern_matches_only_identical_key() {
        assert!(pattern_matches("group_info_G1", "group_info_G1"));
        assert!(!pattern_matches("group_info_G1", "group_info_G12"));
        assert!(!pattern_matches("group_info_G1", "group_info_"));
    }

    #[test]
    fn test_trailing_wildcard_matches_prefix() {
        assert!(pattern_matches(
            "my_joined_group_list*",
            "my_joined_group_list_u-1"
        ));
        assert!(pattern_matches(
            "my_joined_group_list*",
            "my_joined_group_list"
        ));
        assert!(!pattern_matches(
            "my_joined_group_list*",
            "contact_mygroup_list_u-1"
        ));
    }

    #[test]
    fn test_bare_wildcard_matches_everything() {
        assert!(pattern_matches("*", "anything"));
        assert!(pattern_matches("*", ""));
    }
}
