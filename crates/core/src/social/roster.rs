//! Roster codec.
//!
//! The group roster is stored denormalized as a JSON array of member
//! user ids, in join order with the owner first. Decoding a blob that
//! is not a JSON string array fails with [`RosterError::Corrupt`];
//! encoding never fails.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("corrupt roster blob: {0}")]
    Corrupt(String),
}

/// Decodes a roster blob into the ordered member id list.
pub fn decode_roster(blob: &[u8]) -> Result<Vec<String>, RosterError> {
    serde_json::from_slice(blob).map_err(|err| RosterError::Corrupt(err.to_string()))
}

/// Encodes an ordered member id list into a roster blob.
pub fn encode_roster(members: &[String]) -> Vec<u8> {
    // A slice of strings always serializes to a JSON array.
    serde_json::to_vec(members).expect("string slice serializes to JSON")
}

/// Removes the first occurrence of `member_id` from the roster.
///
/// Returns `true` if an occurrence was removed. Later duplicates, if
/// any, are left in place.
pub fn remove_first(members: &mut Vec<String>, member_id: &str) -> bool {
    match members.iter().position(|m| m == member_id) {
        Some(idx) => {
            members.remove(idx);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let members = roster(&["owner", "b", "a", "c"]);
        let blob = encode_roster(&members);

        assert_eq!(decode_roster(&blob).unwrap(), members);
    }

    #[test]
    fn test_empty_roster_encodes_to_empty_array() {
        let blob = encode_roster(&[]);

        assert_eq!(blob, b"[]");
        assert_eq!(decode_roster(&blob).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(matches!(
            decode_roster(b"not json"),
            Err(RosterError::Corrupt(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_array_json() {
        assert!(matches!(
            decode_roster(b"{\"a\":1}"),
            Err(RosterError::Corrupt(_))
        ));
        assert!(matches!(
            decode_roster(b"[1,2,3]"),
            Err(RosterError::Corrupt(_))
        ));
    }

    #[test]
    fn test_remove_first_removes_only_first_occurrence() {
        let mut members = roster(&["a", "b", "a", "c"]);

        assert!(remove_first(&mut members, "a"));
        assert_eq!(members, roster(&["b", "a", "c"]));
    }

    #[test]
    fn test_remove_first_on_absent_member_is_noop() {
        let mut members = roster(&["a", "b"]);

        assert!(!remove_first(&mut members, "z"));
        assert_eq!(members, roster(&["a", "b"]));
    }

    #[test]
    fn test_unicode_member_ids_survive_round_trip() {
        let members = roster(&["用户-1", "ユーザー2"]);

        assert_eq!(decode_roster(&encode_roster(&members)).unwrap(), members);
    }
}
