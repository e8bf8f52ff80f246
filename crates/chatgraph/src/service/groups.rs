//! Group roster operations.
//!
//! Every public method folds errors into an [`Outcome`]: store
//! failures and corrupt rosters become `SystemError`, business-rule
//! violations become `Rejected`, and cache failures are logged but
//! never change the outcome. Mutations follow a fixed order: validate,
//! edit the roster in memory, write the group, write dependent
//! entities, then invalidate stale cache entries.
//!
//! There is no cross-entity transaction. When a later write fails the
//! earlier ones stay behind; callers get `SystemError` and retry.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use chatgraph_core::cache::serialization::{
    deserialize_group_info, deserialize_group_members, deserialize_group_summaries,
    serialize_group_info, serialize_group_members, serialize_group_summaries,
};
use chatgraph_core::cache::{group_info_key, group_member_list_key, my_group_list_key, Cache};
use chatgraph_core::outcome::Outcome;
use chatgraph_core::social::{
    decode_roster, encode_roster, roster, AddMode, ContactEdge, ContactStatus, Group, GroupInfo,
    GroupMember, GroupSummary,
};
use chatgraph_core::storage::SocialStore;

use crate::ids;

use super::invalidation::{Invalidator, RosterMutation};
use super::read_through::{cache_get, cache_put};

/// Parameters for creating a group.
#[derive(Debug, Clone)]
pub struct CreateGroup {
    pub name: String,
    pub notice: String,
    pub owner_id: String,
    pub add_mode: AddMode,
    pub avatar: String,
}

/// A partial group update. `None` fields keep their stored value.
#[derive(Debug, Clone)]
pub struct GroupPatch {
    pub group_id: String,
    pub name: Option<String>,
    pub notice: Option<String>,
    pub avatar: Option<String>,
    pub add_mode: Option<AddMode>,
}

/// The group roster and cache-consistency service.
#[derive(Clone)]
pub struct GroupService {
    store: Arc<dyn SocialStore>,
    cache: Arc<dyn Cache>,
    invalidator: Invalidator,
    cache_ttl: Duration,
}

impl GroupService {
    pub fn new(
        store: Arc<dyn SocialStore>,
        cache: Arc<dyn Cache>,
        cache_ttl: Duration,
        invalidation_max_passes: usize,
    ) -> Self {
        let invalidator = Invalidator::new(cache.clone(), invalidation_max_passes);
        Self {
            store,
            cache,
            invalidator,
            cache_ttl,
        }
    }

    /// Creates a group with the owner as its only member.
    ///
    /// The owner's contact edge is written after the group row; if the
    /// edge write fails the group stays behind without it.
    pub async fn create_group(&self, req: CreateGroup) -> Outcome<String> {
        let group = Group::new(
            ids::new_group_id(),
            req.name,
            req.notice,
            req.owner_id,
            req.add_mode,
            req.avatar,
        );

        if let Err(err) = self.store.create_group(&group).await {
            tracing::error!(group_id = %group.id, error = %err, "creating group failed");
            return Outcome::system_error();
        }

        let edge = ContactEdge::group_membership(&group.owner_id, &group.id);
        if let Err(err) = self.store.create_contact(&edge).await {
            tracing::error!(group_id = %group.id, error = %err, "creating owner contact edge failed");
            return Outcome::system_error();
        }

        self.invalidator
            .invalidate(&RosterMutation::GroupCreated {
                owner_id: group.owner_id.clone(),
            })
            .await;

        tracing::debug!(group_id = %group.id, owner_id = %group.owner_id, "group created");
        Outcome::success("group created", group.id)
    }

    /// Lists the live groups a user owns, newest first.
    pub async fn load_my_group(&self, owner_id: &str) -> Outcome<Vec<GroupSummary>> {
        let key = my_group_list_key(owner_id);
        if let Some(bytes) = cache_get(self.cache.as_ref(), &key).await {
            match deserialize_group_summaries(&bytes) {
                Ok(summaries) => return Outcome::success("fetch success", summaries),
                Err(err) => {
                    tracing::warn!(key, error = %err, "corrupt cached group listing, refetching")
                }
            }
        }

        let groups = match self.store.get_groups_by_owner(owner_id).await {
            Ok(groups) => groups,
            Err(err) => {
                tracing::error!(owner_id, error = %err, "listing owned groups failed");
                return Outcome::system_error();
            }
        };
        let summaries: Vec<GroupSummary> = groups.iter().map(GroupSummary::from_group).collect();

        match serialize_group_summaries(&summaries) {
            Ok(bytes) => cache_put(self.cache.as_ref(), &key, &bytes, self.cache_ttl).await,
            Err(err) => tracing::warn!(key, error = %err, "serializing group listing failed"),
        }
        Outcome::success("fetch success", summaries)
    }

    /// Reports how a group admits new members.
    ///
    /// Served from the same cached snapshot as [`get_group_info`].
    ///
    /// [`get_group_info`]: GroupService::get_group_info
    pub async fn check_group_add_mode(&self, group_id: &str) -> Outcome<AddMode> {
        match self.group_info_snapshot(group_id).await {
            Some(info) => Outcome::success("fetch success", info.add_mode),
            None => Outcome::system_error(),
        }
    }

    /// The full group detail view, including dismissed groups.
    pub async fn get_group_info(&self, group_id: &str) -> Outcome<GroupInfo> {
        match self.group_info_snapshot(group_id).await {
            Some(info) => Outcome::success("fetch success", info),
            None => Outcome::system_error(),
        }
    }

    /// Adds a user to a group's roster without any approval step.
    ///
    /// There is no duplicate check; entering twice leaves two roster
    /// entries.
    pub async fn enter_group_directly(&self, group_id: &str, user_id: &str) -> Outcome<()> {
        let Some(mut group) = self.load_live_group(group_id).await else {
            return Outcome::system_error();
        };
        let mut members = match decode_roster(&group.members) {
            Ok(members) => members,
            Err(err) => {
                tracing::error!(group_id, error = %err, "corrupt roster");
                return Outcome::system_error();
            }
        };

        members.push(user_id.to_string());
        group.members = encode_roster(&members);
        group.member_cnt = members.len() as i64;
        group.updated_at = Utc::now();

        if let Err(err) = self.store.save_group(&group).await {
            tracing::error!(group_id, error = %err, "saving roster failed");
            return Outcome::system_error();
        }
        let edge = ContactEdge::group_membership(user_id, group_id);
        if let Err(err) = self.store.create_contact(&edge).await {
            tracing::error!(group_id, user_id, error = %err, "creating member contact edge failed");
            return Outcome::system_error();
        }

        self.invalidator
            .invalidate(&RosterMutation::MemberEntered {
                group_id: group_id.to_string(),
            })
            .await;

        tracing::debug!(group_id, user_id, "member entered group");
        Outcome::success_empty("entered group")
    }

    /// Removes a user from a group at their own request.
    ///
    /// Leaving a group one is not in succeeds and changes nothing in
    /// the roster; the dependent tombstones still run.
    pub async fn leave_group(&self, user_id: &str, group_id: &str) -> Outcome<()> {
        let Some(mut group) = self.load_live_group(group_id).await else {
            return Outcome::system_error();
        };
        let mut members = match decode_roster(&group.members) {
            Ok(members) => members,
            Err(err) => {
                tracing::error!(group_id, error = %err, "corrupt roster");
                return Outcome::system_error();
            }
        };

        roster::remove_first(&mut members, user_id);
        group.members = encode_roster(&members);
        group.member_cnt = members.len() as i64;
        group.updated_at = Utc::now();

        if let Err(err) = self.store.save_group(&group).await {
            tracing::error!(group_id, error = %err, "saving roster failed");
            return Outcome::system_error();
        }

        let now = Utc::now();
        if let Err(err) = self.store.soft_delete_session(user_id, group_id, now).await {
            tracing::error!(group_id, user_id, error = %err, "tombstoning session failed");
            return Outcome::system_error();
        }
        if let Err(err) = self
            .store
            .patch_contact(user_id, group_id, Some(ContactStatus::QuitGroup), Some(now))
            .await
        {
            tracing::error!(group_id, user_id, error = %err, "patching contact edge failed");
            return Outcome::system_error();
        }
        if let Err(err) = self.store.soft_delete_apply(user_id, group_id, now).await {
            tracing::error!(group_id, user_id, error = %err, "tombstoning apply failed");
            return Outcome::system_error();
        }

        self.invalidator
            .invalidate(&RosterMutation::MemberLeft {
                user_id: user_id.to_string(),
            })
            .await;

        tracing::debug!(group_id, user_id, "member left group");
        Outcome::success_empty("left group")
    }

    /// Evicts a batch of members from a group.
    ///
    /// Rejected before any write when the owner appears in the batch.
    /// Each evicted id loses every roster occurrence, unlike
    /// [`leave_group`] which removes only the first.
    ///
    /// [`leave_group`]: GroupService::leave_group
    pub async fn remove_group_members(
        &self,
        group_id: &str,
        owner_id: &str,
        member_ids: &[String],
    ) -> Outcome<()> {
        let Some(mut group) = self.load_live_group(group_id).await else {
            return Outcome::system_error();
        };

        if member_ids.iter().any(|id| id == owner_id) {
            return Outcome::rejected("cannot remove the group owner");
        }

        let mut members = match decode_roster(&group.members) {
            Ok(members) => members,
            Err(err) => {
                tracing::error!(group_id, error = %err, "corrupt roster");
                return Outcome::system_error();
            }
        };

        let now = Utc::now();
        for member_id in member_ids {
            members.retain(|m| m != member_id);

            if let Err(err) = self.store.soft_delete_session(member_id, group_id, now).await {
                tracing::error!(group_id, member_id, error = %err, "tombstoning session failed");
                return Outcome::system_error();
            }
            if let Err(err) = self
                .store
                .patch_contact(member_id, group_id, None, Some(now))
                .await
            {
                tracing::error!(group_id, member_id, error = %err, "tombstoning contact edge failed");
                return Outcome::system_error();
            }
            if let Err(err) = self.store.soft_delete_apply(member_id, group_id, now).await {
                tracing::error!(group_id, member_id, error = %err, "tombstoning apply failed");
                return Outcome::system_error();
            }
        }

        group.members = encode_roster(&members);
        group.member_cnt = members.len() as i64;
        group.updated_at = now;
        if let Err(err) = self.store.save_group(&group).await {
            tracing::error!(group_id, error = %err, "saving roster failed");
            return Outcome::system_error();
        }

        self.invalidator.invalidate(&RosterMutation::MembersRemoved).await;

        tracing::debug!(group_id, removed = member_ids.len(), "members removed from group");
        Outcome::success_empty("members removed")
    }

    /// Dissolves a group: tombstones the group row and every session,
    /// contact edge, and join application pointing at it.
    pub async fn dismiss_group(&self, owner_id: &str, group_id: &str) -> Outcome<()> {
        let now = Utc::now();
        if let Err(err) = self.store.soft_delete_group(group_id, now).await {
            tracing::error!(group_id, error = %err, "tombstoning group failed");
            return Outcome::system_error();
        }

        let sessions = match self.store.get_sessions_by_receiver(group_id).await {
            Ok(sessions) => sessions,
            Err(err) => {
                tracing::error!(group_id, error = %err, "listing group sessions failed");
                return Outcome::system_error();
            }
        };
        for session in sessions {
            if let Err(err) = self
                .store
                .soft_delete_session(&session.send_id, &session.receive_id, now)
                .await
            {
                tracing::error!(group_id, send_id = %session.send_id, error = %err, "tombstoning session failed");
                return Outcome::system_error();
            }
        }

        let contacts = match self.store.get_contacts_by_contact_id(group_id).await {
            Ok(contacts) => contacts,
            Err(err) => {
                tracing::error!(group_id, error = %err, "listing group contact edges failed");
                return Outcome::system_error();
            }
        };
        for contact in contacts {
            if let Err(err) = self
                .store
                .patch_contact(&contact.user_id, group_id, None, Some(now))
                .await
            {
                tracing::error!(group_id, user_id = %contact.user_id, error = %err, "tombstoning contact edge failed");
                return Outcome::system_error();
            }
        }

        // A group with no pending applications is the common case.
        let applies = match self.store.get_applies_by_contact_id(group_id).await {
            Ok(applies) => applies,
            Err(err) => {
                tracing::error!(group_id, error = %err, "listing group applies failed");
                return Outcome::system_error();
            }
        };
        for apply in applies {
            if let Err(err) = self
                .store
                .soft_delete_apply(&apply.user_id, group_id, now)
                .await
            {
                tracing::error!(group_id, user_id = %apply.user_id, error = %err, "tombstoning apply failed");
                return Outcome::system_error();
            }
        }

        self.invalidator
            .invalidate(&RosterMutation::GroupDismissed {
                owner_id: owner_id.to_string(),
            })
            .await;

        tracing::debug!(group_id, owner_id, "group dismissed");
        Outcome::success_empty("group dismissed")
    }

    /// Applies a partial update to a group and mirrors the new display
    /// fields onto every live session pointing at it.
    ///
    /// Cached snapshots are refreshed by TTL expiry only; there is no
    /// invalidation on this path.
    pub async fn update_group_info(&self, patch: GroupPatch) -> Outcome<()> {
        let Some(mut group) = self.load_live_group(&patch.group_id).await else {
            return Outcome::system_error();
        };

        if let Some(name) = patch.name {
            group.name = name;
        }
        if let Some(notice) = patch.notice {
            group.notice = notice;
        }
        if let Some(avatar) = patch.avatar {
            group.avatar = avatar;
        }
        if let Some(add_mode) = patch.add_mode {
            group.add_mode = add_mode;
        }
        group.updated_at = Utc::now();

        if let Err(err) = self.store.save_group(&group).await {
            tracing::error!(group_id = %group.id, error = %err, "saving group failed");
            return Outcome::system_error();
        }

        let sessions = match self.store.get_sessions_by_receiver(&group.id).await {
            Ok(sessions) => sessions,
            Err(err) => {
                tracing::error!(group_id = %group.id, error = %err, "listing group sessions failed");
                return Outcome::system_error();
            }
        };
        for mut session in sessions {
            session.receive_name = group.name.clone();
            session.avatar = group.avatar.clone();
            session.updated_at = group.updated_at;
            if let Err(err) = self.store.save_session(&session).await {
                tracing::error!(group_id = %group.id, send_id = %session.send_id, error = %err, "updating session display fields failed");
                return Outcome::system_error();
            }
        }

        tracing::debug!(group_id = %group.id, "group info updated");
        Outcome::success_empty("update success")
    }

    /// Lists a group's members in roster order with their profiles.
    pub async fn get_group_member_list(&self, group_id: &str) -> Outcome<Vec<GroupMember>> {
        let key = group_member_list_key(group_id);
        if let Some(bytes) = cache_get(self.cache.as_ref(), &key).await {
            match deserialize_group_members(&bytes) {
                Ok(members) => return Outcome::success("fetch success", members),
                Err(err) => {
                    tracing::warn!(key, error = %err, "corrupt cached member listing, refetching")
                }
            }
        }

        let Some(group) = self.load_live_group(group_id).await else {
            return Outcome::system_error();
        };
        let member_ids = match decode_roster(&group.members) {
            Ok(members) => members,
            Err(err) => {
                tracing::error!(group_id, error = %err, "corrupt roster");
                return Outcome::system_error();
            }
        };

        let mut members = Vec::with_capacity(member_ids.len());
        for member_id in &member_ids {
            let profile = match self.store.get_user(member_id).await {
                Ok(Some(profile)) => profile,
                Ok(None) => {
                    tracing::error!(group_id, member_id, "roster references unknown user");
                    return Outcome::system_error();
                }
                Err(err) => {
                    tracing::error!(group_id, member_id, error = %err, "loading member profile failed");
                    return Outcome::system_error();
                }
            };
            members.push(GroupMember {
                user_id: profile.id,
                nickname: profile.nickname,
                avatar: profile.avatar,
            });
        }

        match serialize_group_members(&members) {
            Ok(bytes) => cache_put(self.cache.as_ref(), &key, &bytes, self.cache_ttl).await,
            Err(err) => tracing::warn!(key, error = %err, "serializing member listing failed"),
        }
        Outcome::success("fetch success", members)
    }

    /// Loads a group for mutation. Missing and dismissed groups are
    /// both treated as absent.
    async fn load_live_group(&self, group_id: &str) -> Option<Group> {
        match self.store.get_group(group_id).await {
            Ok(Some(group)) if group.deleted_at.is_none() => Some(group),
            Ok(Some(_)) => {
                tracing::error!(group_id, "group is dismissed");
                None
            }
            Ok(None) => {
                tracing::error!(group_id, "group not found");
                None
            }
            Err(err) => {
                tracing::error!(group_id, error = %err, "loading group failed");
                None
            }
        }
    }

    /// The cached group detail snapshot, refetched from the store on a
    /// miss. Tombstoned groups are included so the snapshot can report
    /// `is_deleted`.
    async fn group_info_snapshot(&self, group_id: &str) -> Option<GroupInfo> {
        let key = group_info_key(group_id);
        if let Some(bytes) = cache_get(self.cache.as_ref(), &key).await {
            match deserialize_group_info(&bytes) {
                Ok(info) => return Some(info),
                Err(err) => {
                    tracing::warn!(key, error = %err, "corrupt cached group snapshot, refetching")
                }
            }
        }

        let group = match self.store.get_group(group_id).await {
            Ok(Some(group)) => group,
            Ok(None) => {
                tracing::error!(group_id, "group not found");
                return None;
            }
            Err(err) => {
                tracing::error!(group_id, error = %err, "loading group failed");
                return None;
            }
        };
        let info = GroupInfo::from_group(&group);

        match serialize_group_info(&info) {
            Ok(bytes) => cache_put(self.cache.as_ref(), &key, &bytes, self.cache_ttl).await,
            Err(err) => tracing::warn!(key, error = %err, "serializing group snapshot failed"),
        }
        Some(info)
    }
}
