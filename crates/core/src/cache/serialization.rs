//! Pure functions for serializing/deserializing projections to/from cache bytes.
//!
//! Cached snapshots are JSON so cache contents stay human-readable and
//! easy to inspect.

use thiserror::Error;

use crate::social::{GroupInfo, GroupMember, GroupSummary};

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a group detail snapshot to JSON bytes.
pub fn serialize_group_info(info: &GroupInfo) -> Result<Vec<u8>> {
    serde_json::to_vec(info).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a group detail snapshot.
pub fn deserialize_group_info(bytes: &[u8]) -> Result<GroupInfo> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes a group listing to JSON bytes.
pub fn serialize_group_summaries(summaries: &[GroupSummary]) -> Result<Vec<u8>> {
    serde_json::to_vec(summaries).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a group listing.
pub fn deserialize_group_summaries(bytes: &[u8]) -> Result<Vec<GroupSummary>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes a member listing to JSON bytes.
pub fn serialize_group_members(members: &[GroupMember]) -> Result<Vec<u8>> {
    serde_json::to_vec(members).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a member listing.
pub fn deserialize_group_members(bytes: &[u8]) -> Result<Vec<GroupMember>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::{AddMode, GroupStatus};

    fn sample_info() -> GroupInfo {
        GroupInfo {
            id: "G12345678901".to_string(),
            name: "rustaceans".to_string(),
            notice: "be kind".to_string(),
            owner_id: "u-1".to_string(),
            member_cnt: 3,
            add_mode: AddMode::ApprovalRequired,
            avatar: "g.png".to_string(),
            status: GroupStatus::Normal,
            is_deleted: false,
        }
    }

    #[test]
    fn test_roundtrip_group_info() {
        let info = sample_info();

        let bytes = serialize_group_info(&info).expect("serialize should succeed");
        let deserialized = deserialize_group_info(&bytes).expect("deserialize should succeed");

        assert_eq!(info, deserialized);
    }

    #[test]
    fn test_roundtrip_group_summaries() {
        let summaries = vec![
            GroupSummary {
                id: "G1".to_string(),
                name: "a".to_string(),
                avatar: "a.png".to_string(),
            },
            GroupSummary {
                id: "G2".to_string(),
                name: "b".to_string(),
                avatar: String::new(),
            },
        ];

        let bytes = serialize_group_summaries(&summaries).expect("serialize should succeed");
        let deserialized = deserialize_group_summaries(&bytes).expect("deserialize should succeed");

        assert_eq!(summaries, deserialized);
    }

    #[test]
    fn test_roundtrip_group_members() {
        let members = vec![GroupMember {
            user_id: "u-1".to_string(),
            nickname: "ferris".to_string(),
            avatar: "f.png".to_string(),
        }];

        let bytes = serialize_group_members(&members).expect("serialize should succeed");
        let deserialized = deserialize_group_members(&bytes).expect("deserialize should succeed");

        assert_eq!(members, deserialized);
    }

    #[test]
    fn test_empty_summaries_serialize_to_empty_array() {
        let bytes = serialize_group_summaries(&[]).expect("serialize should succeed");

        assert_eq!(bytes, b"[]");
        assert!(deserialize_group_summaries(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_deserialize_malformed_bytes() {
        let result = deserialize_group_info(b"not valid json");

        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }

    #[test]
    fn test_deserialize_wrong_shape() {
        let result = deserialize_group_members(b"{\"invalid\": true}");

        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }
}
