//! Persistent social graph entities.
//!
//! Every entity that can be removed carries a `deleted_at` tombstone
//! instead of being physically deleted. Queries that hide tombstoned
//! rows do so explicitly at the repository layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::roster::encode_roster;

/// How new members may join a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddMode {
    /// Anyone may enter directly.
    Open,
    /// Joining requires owner approval.
    ApprovalRequired,
    /// No new members are accepted.
    Closed,
}

impl AddMode {
    pub fn as_i8(self) -> i8 {
        match self {
            AddMode::Open => 0,
            AddMode::ApprovalRequired => 1,
            AddMode::Closed => 2,
        }
    }

    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            0 => Some(AddMode::Open),
            1 => Some(AddMode::ApprovalRequired),
            2 => Some(AddMode::Closed),
            _ => None,
        }
    }
}

/// Lifecycle state of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupStatus {
    Normal,
    Dismissed,
}

impl GroupStatus {
    pub fn as_i8(self) -> i8 {
        match self {
            GroupStatus::Normal => 0,
            GroupStatus::Dismissed => 1,
        }
    }

    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            0 => Some(GroupStatus::Normal),
            1 => Some(GroupStatus::Dismissed),
            _ => None,
        }
    }
}

/// A chat group.
///
/// `members` is the denormalized roster blob: a JSON array of member
/// user ids in join order, with the owner first. `member_cnt` is kept
/// equal to the decoded roster length on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub notice: String,
    pub owner_id: String,
    pub member_cnt: i64,
    pub add_mode: AddMode,
    pub avatar: String,
    pub status: GroupStatus,
    pub members: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Group {
    /// Builds a fresh group whose roster contains only the owner.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        notice: impl Into<String>,
        owner_id: impl Into<String>,
        add_mode: AddMode,
        avatar: impl Into<String>,
    ) -> Self {
        let owner_id = owner_id.into();
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            notice: notice.into(),
            owner_id: owner_id.clone(),
            member_cnt: 1,
            add_mode,
            avatar: avatar.into(),
            status: GroupStatus::Normal,
            members: encode_roster(&[owner_id]),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// What kind of entity a contact edge points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    User,
    Group,
}

/// Relationship state recorded on a contact edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactStatus {
    Normal,
    QuitGroup,
    Removed,
}

/// A membership or friendship edge from a user to a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactEdge {
    pub user_id: String,
    pub contact_id: String,
    pub kind: ContactKind,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ContactEdge {
    /// A live user-to-group membership edge.
    pub fn group_membership(user_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            contact_id: group_id.into(),
            kind: ContactKind::Group,
            status: ContactStatus::Normal,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// A user's conversation entry for a peer or group.
///
/// Identified by the `(send_id, receive_id)` pair. For group sessions
/// `receive_id` is the group id and the display fields mirror the
/// group's name and avatar at last write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub send_id: String,
    pub receive_id: String,
    pub receive_name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(
        send_id: impl Into<String>,
        receive_id: impl Into<String>,
        receive_name: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            send_id: send_id.into(),
            receive_id: receive_id.into(),
            receive_name: receive_name.into(),
            avatar: avatar.into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// A pending or historical application to join a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactApply {
    pub user_id: String,
    pub contact_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// The slice of a user record needed for member listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub nickname: String,
    pub avatar: String,
}
