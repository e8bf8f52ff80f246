//! Read-side projections.
//!
//! Flattened views of the social graph served by the query layer and
//! cached as JSON snapshots.

use serde::{Deserialize, Serialize};

use super::types::{AddMode, Group, GroupStatus};

/// A row in a "my groups" or "joined groups" listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl GroupSummary {
    pub fn from_group(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            avatar: group.avatar.clone(),
        }
    }
}

/// The full group detail view, including the deletion flag so callers
/// can tell a dismissed group from a live one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub id: String,
    pub name: String,
    pub notice: String,
    pub owner_id: String,
    pub member_cnt: i64,
    pub add_mode: AddMode,
    pub avatar: String,
    pub status: GroupStatus,
    pub is_deleted: bool,
}

impl GroupInfo {
    pub fn from_group(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            notice: group.notice.clone(),
            owner_id: group.owner_id.clone(),
            member_cnt: group.member_cnt,
            add_mode: group.add_mode,
            avatar: group.avatar.clone(),
            status: group.status,
            is_deleted: group.is_deleted(),
        }
    }
}

/// A row in a group member listing, in roster order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: String,
    pub nickname: String,
    pub avatar: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_group_info_reflects_tombstone() {
        let mut group = Group::new("G1", "g", "", "o", AddMode::Open, "");
        assert!(!GroupInfo::from_group(&group).is_deleted);

        group.deleted_at = Some(Utc::now());
        assert!(GroupInfo::from_group(&group).is_deleted);
    }

    #[test]
    fn test_group_summary_carries_display_fields() {
        let group = Group::new("G1", "rustaceans", "", "o", AddMode::Open, "g.png");
        let summary = GroupSummary::from_group(&group);

        assert_eq!(summary.id, "G1");
        assert_eq!(summary.name, "rustaceans");
        assert_eq!(summary.avatar, "g.png");
    }
}
