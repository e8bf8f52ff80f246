//! In-memory storage implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use chatgraph_core::social::{ContactApply, ContactEdge, ContactStatus, Group, Session, UserProfile};
use chatgraph_core::storage::{
    ApplyRepository, ContactRepository, GroupRepository, RepositoryError, Result,
    SessionRepository, UserRepository,
};

/// In-memory storage backend for testing.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the store is dropped.
///
/// Contact edges, sessions, and applications are keyed by their id
/// pair, so re-creating one replaces the previous row instead of
/// accumulating duplicates.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    groups: Arc<RwLock<HashMap<String, Group>>>,
    contacts: Arc<RwLock<HashMap<(String, String), ContactEdge>>>,
    sessions: Arc<RwLock<HashMap<(String, String), Session>>>,
    applies: Arc<RwLock<HashMap<(String, String), ContactApply>>>,
    users: Arc<RwLock<HashMap<String, UserProfile>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            groups: Arc::new(RwLock::new(HashMap::new())),
            contacts: Arc::new(RwLock::new(HashMap::new())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            applies: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn get_group(&self, id: &str) -> Result<Option<Group>> {
        let groups = self.groups.read().await;
        Ok(groups.get(id).cloned())
    }

    async fn get_groups_by_owner(&self, owner_id: &str) -> Result<Vec<Group>> {
        let groups = self.groups.read().await;
        let mut owned: Vec<Group> = groups
            .values()
            .filter(|g| g.owner_id == owner_id && g.deleted_at.is_none())
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn create_group(&self, group: &Group) -> Result<()> {
        let mut groups = self.groups.write().await;
        if groups.contains_key(&group.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Group",
                id: group.id.clone(),
            });
        }
        groups.insert(group.id.clone(), group.clone());
        Ok(())
    }

    async fn save_group(&self, group: &Group) -> Result<()> {
        let mut groups = self.groups.write().await;
        groups.insert(group.id.clone(), group.clone());
        Ok(())
    }

    async fn soft_delete_group(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        let mut groups = self.groups.write().await;
        if let Some(group) = groups.get_mut(id) {
            group.deleted_at = Some(at);
            group.updated_at = at;
        }
        Ok(())
    }
}

#[async_trait]
impl ContactRepository for InMemoryStore {
    async fn create_contact(&self, contact: &ContactEdge) -> Result<()> {
        let mut contacts = self.contacts.write().await;
        let key = (contact.user_id.clone(), contact.contact_id.clone());
        contacts.insert(key, contact.clone());
        Ok(())
    }

    async fn patch_contact(
        &self,
        user_id: &str,
        contact_id: &str,
        status: Option<ContactStatus>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut contacts = self.contacts.write().await;
        let key = (user_id.to_string(), contact_id.to_string());
        if let Some(edge) = contacts.get_mut(&key) {
            // Tombstoned edges are invisible to patches.
            if edge.deleted_at.is_some() {
                return Ok(());
            }
            if let Some(status) = status {
                edge.status = status;
            }
            if let Some(at) = deleted_at {
                edge.deleted_at = Some(at);
            }
            edge.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn get_contacts_by_contact_id(&self, contact_id: &str) -> Result<Vec<ContactEdge>> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .values()
            .filter(|e| e.contact_id == contact_id && e.deleted_at.is_none())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn save_session(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let key = (session.send_id.clone(), session.receive_id.clone());
        sessions.insert(key, session.clone());
        Ok(())
    }

    async fn soft_delete_session(
        &self,
        send_id: &str,
        receive_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let key = (send_id.to_string(), receive_id.to_string());
        if let Some(session) = sessions.get_mut(&key) {
            if session.deleted_at.is_none() {
                session.deleted_at = Some(at);
                session.updated_at = at;
            }
        }
        Ok(())
    }

    async fn get_sessions_by_receiver(&self, receive_id: &str) -> Result<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.receive_id == receive_id && s.deleted_at.is_none())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ApplyRepository for InMemoryStore {
    async fn create_apply(&self, apply: &ContactApply) -> Result<()> {
        let mut applies = self.applies.write().await;
        let key = (apply.user_id.clone(), apply.contact_id.clone());
        applies.insert(key, apply.clone());
        Ok(())
    }

    async fn soft_delete_apply(
        &self,
        user_id: &str,
        contact_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut applies = self.applies.write().await;
        let key = (user_id.to_string(), contact_id.to_string());
        if let Some(apply) = applies.get_mut(&key) {
            if apply.deleted_at.is_none() {
                apply.deleted_at = Some(at);
                apply.updated_at = at;
            }
        }
        Ok(())
    }

    async fn get_applies_by_contact_id(&self, contact_id: &str) -> Result<Vec<ContactApply>> {
        let applies = self.applies.read().await;
        Ok(applies
            .values()
            .filter(|a| a.contact_id == contact_id && a.deleted_at.is_none())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn create_user(&self, user: &UserProfile) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "UserProfile",
                id: user.id.clone(),
            });
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }
}
