use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::social::{ContactApply, ContactEdge, ContactStatus, Group, Session, UserProfile};

use super::Result;

/// Repository for group operations.
///
/// Soft-deleted groups are still returned by [`get_group`] so callers
/// can distinguish a dismissed group from one that never existed; the
/// owner listing hides them.
///
/// [`get_group`]: GroupRepository::get_group
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Gets a group by its ID, including soft-deleted ones.
    async fn get_group(&self, id: &str) -> Result<Option<Group>>;

    /// Gets all live groups owned by a user, newest first.
    async fn get_groups_by_owner(&self, owner_id: &str) -> Result<Vec<Group>>;

    /// Creates a new group.
    async fn create_group(&self, group: &Group) -> Result<()>;

    /// Writes a group back, replacing the stored row.
    async fn save_group(&self, group: &Group) -> Result<()>;

    /// Marks a group as deleted at the given instant.
    async fn soft_delete_group(&self, id: &str, at: DateTime<Utc>) -> Result<()>;
}

/// Repository for contact edge operations.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Creates a new contact edge.
    async fn create_contact(&self, contact: &ContactEdge) -> Result<()>;

    /// Patches the edge identified by `(user_id, contact_id)`.
    ///
    /// Only the supplied fields change. Matching zero rows is not an
    /// error; the patch simply has no effect.
    async fn patch_contact(
        &self,
        user_id: &str,
        contact_id: &str,
        status: Option<ContactStatus>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<()>;

    /// Gets all live edges pointing at a contact.
    async fn get_contacts_by_contact_id(&self, contact_id: &str) -> Result<Vec<ContactEdge>>;
}

/// Repository for session operations.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Creates or replaces the session for `(send_id, receive_id)`.
    async fn save_session(&self, session: &Session) -> Result<()>;

    /// Marks the session for `(send_id, receive_id)` as deleted.
    ///
    /// Matching zero rows is not an error.
    async fn soft_delete_session(
        &self,
        send_id: &str,
        receive_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()>;

    /// Gets all live sessions whose receiver is the given id.
    async fn get_sessions_by_receiver(&self, receive_id: &str) -> Result<Vec<Session>>;
}

/// Repository for join application operations.
#[async_trait]
pub trait ApplyRepository: Send + Sync {
    /// Creates a new join application.
    async fn create_apply(&self, apply: &ContactApply) -> Result<()>;

    /// Marks the application for `(user_id, contact_id)` as deleted.
    ///
    /// Matching zero rows is not an error.
    async fn soft_delete_apply(
        &self,
        user_id: &str,
        contact_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()>;

    /// Gets all live applications targeting a contact.
    async fn get_applies_by_contact_id(&self, contact_id: &str) -> Result<Vec<ContactApply>>;
}

/// Repository for user profile operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user profile by its ID.
    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>>;

    /// Creates a new user profile.
    async fn create_user(&self, user: &UserProfile) -> Result<()>;
}

/// Combined trait for stores backing the whole social graph.
pub trait SocialStore:
    GroupRepository + ContactRepository + SessionRepository + ApplyRepository + UserRepository
{
}

impl<T> SocialStore for T where
    T: GroupRepository + ContactRepository + SessionRepository + ApplyRepository + UserRepository
{
}
