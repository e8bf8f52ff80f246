//! SQLite store implementation.
//!
//! Implements the repository traits from `chatgraph_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_rusqlite::Connection;

use chatgraph_core::social::{ContactApply, ContactEdge, ContactStatus, Group, Session, UserProfile};
use chatgraph_core::storage::{
    ApplyRepository, ContactRepository, GroupRepository, RepositoryError, Result,
    SessionRepository, UserRepository,
};

use super::conversions::{
    contact_kind_to_i64, contact_status_to_i64, format_datetime, row_to_apply, row_to_contact,
    row_to_group, row_to_session, row_to_user,
};
use super::error::map_tokio_rusqlite_error_with_id;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn group_params(group: &Group) -> (Vec<String>, i64, i64, i64, Vec<u8>, Option<String>) {
    (
        vec![
            group.id.clone(),
            group.name.clone(),
            group.notice.clone(),
            group.owner_id.clone(),
            group.avatar.clone(),
            format_datetime(&group.created_at),
            format_datetime(&group.updated_at),
        ],
        group.member_cnt,
        i64::from(group.add_mode.as_i8()),
        i64::from(group.status.as_i8()),
        group.members.clone(),
        group.deleted_at.as_ref().map(format_datetime),
    )
}

/// SQLite-based store implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new store with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new store with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn write_group(&self, group: &Group, sql: &'static str) -> Result<()> {
        let (strings, member_cnt, add_mode, status, members, deleted_at) = group_params(group);
        let group_id = group.id.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    sql,
                    rusqlite::params![
                        strings[0], // id
                        strings[1], // name
                        strings[2], // notice
                        strings[3], // owner_id
                        member_cnt,
                        add_mode,
                        strings[4], // avatar
                        status,
                        members,
                        strings[5], // created_at
                        strings[6], // updated_at
                        deleted_at,
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Group", group_id))
    }
}

// ============================================================================
// GroupRepository implementation
// ============================================================================

#[async_trait]
impl GroupRepository for SqliteStore {
    async fn get_group(&self, id: &str) -> Result<Option<Group>> {
        let id_owned = id.to_string();
        let id_for_err = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_GROUP_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_owned], row_to_group) {
                    Ok(group) => Ok(Some(group)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Group", id_for_err))
    }

    async fn get_groups_by_owner(&self, owner_id: &str) -> Result<Vec<Group>> {
        let owner = owner_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_GROUPS_BY_OWNER)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&owner], row_to_group).map_err(wrap_err)?;

                let mut groups = Vec::new();
                for row_result in rows {
                    groups.push(row_result.map_err(wrap_err)?);
                }
                Ok(groups)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_group(&self, group: &Group) -> Result<()> {
        self.write_group(group, schema::INSERT_GROUP).await
    }

    async fn save_group(&self, group: &Group) -> Result<()> {
        self.write_group(group, schema::UPSERT_GROUP).await
    }

    async fn soft_delete_group(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        let id_owned = id.to_string();
        let id_for_err = id.to_string();
        let at_str = format_datetime(&at);

        self.conn
            .call(move |conn| {
                conn.execute(schema::SOFT_DELETE_GROUP, rusqlite::params![id_owned, at_str])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Group", id_for_err))
    }
}

// ============================================================================
// ContactRepository implementation
// ============================================================================

#[async_trait]
impl ContactRepository for SqliteStore {
    async fn create_contact(&self, contact: &ContactEdge) -> Result<()> {
        let user_id = contact.user_id.clone();
        let contact_id = contact.contact_id.clone();
        let kind = contact_kind_to_i64(contact.kind);
        let status = contact_status_to_i64(contact.status);
        let created_at = format_datetime(&contact.created_at);
        let updated_at = format_datetime(&contact.updated_at);
        let deleted_at = contact.deleted_at.as_ref().map(format_datetime);
        let err_id = format!("{}/{}", contact.user_id, contact.contact_id);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_CONTACT,
                    rusqlite::params![
                        user_id, contact_id, kind, status, created_at, updated_at, deleted_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ContactEdge", err_id))
    }

    async fn patch_contact(
        &self,
        user_id: &str,
        contact_id: &str,
        status: Option<ContactStatus>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let user = user_id.to_string();
        let contact = contact_id.to_string();
        let status_val = status.map(contact_status_to_i64);
        let deleted_val = deleted_at.as_ref().map(format_datetime);
        let updated_at = format_datetime(&Utc::now());
        let err_id = format!("{user_id}/{contact_id}");

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::PATCH_CONTACT,
                    rusqlite::params![user, contact, status_val, deleted_val, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ContactEdge", err_id))
    }

    async fn get_contacts_by_contact_id(&self, contact_id: &str) -> Result<Vec<ContactEdge>> {
        let contact = contact_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_CONTACTS_BY_CONTACT_ID)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&contact], row_to_contact).map_err(wrap_err)?;

                let mut edges = Vec::new();
                for row_result in rows {
                    edges.push(row_result.map_err(wrap_err)?);
                }
                Ok(edges)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// SessionRepository implementation
// ============================================================================

#[async_trait]
impl SessionRepository for SqliteStore {
    async fn save_session(&self, session: &Session) -> Result<()> {
        let send_id = session.send_id.clone();
        let receive_id = session.receive_id.clone();
        let receive_name = session.receive_name.clone();
        let avatar = session.avatar.clone();
        let created_at = format_datetime(&session.created_at);
        let updated_at = format_datetime(&session.updated_at);
        let deleted_at = session.deleted_at.as_ref().map(format_datetime);
        let err_id = format!("{}/{}", session.send_id, session.receive_id);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_SESSION,
                    rusqlite::params![
                        send_id,
                        receive_id,
                        receive_name,
                        avatar,
                        created_at,
                        updated_at,
                        deleted_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Session", err_id))
    }

    async fn soft_delete_session(
        &self,
        send_id: &str,
        receive_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let send = send_id.to_string();
        let receive = receive_id.to_string();
        let at_str = format_datetime(&at);
        let err_id = format!("{send_id}/{receive_id}");

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::SOFT_DELETE_SESSION,
                    rusqlite::params![send, receive, at_str],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Session", err_id))
    }

    async fn get_sessions_by_receiver(&self, receive_id: &str) -> Result<Vec<Session>> {
        let receive = receive_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_SESSIONS_BY_RECEIVER)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&receive], row_to_session).map_err(wrap_err)?;

                let mut sessions = Vec::new();
                for row_result in rows {
                    sessions.push(row_result.map_err(wrap_err)?);
                }
                Ok(sessions)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// ApplyRepository implementation
// ============================================================================

#[async_trait]
impl ApplyRepository for SqliteStore {
    async fn create_apply(&self, apply: &ContactApply) -> Result<()> {
        let user_id = apply.user_id.clone();
        let contact_id = apply.contact_id.clone();
        let created_at = format_datetime(&apply.created_at);
        let updated_at = format_datetime(&apply.updated_at);
        let deleted_at = apply.deleted_at.as_ref().map(format_datetime);
        let err_id = format!("{}/{}", apply.user_id, apply.contact_id);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_APPLY,
                    rusqlite::params![user_id, contact_id, created_at, updated_at, deleted_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ContactApply", err_id))
    }

    async fn soft_delete_apply(
        &self,
        user_id: &str,
        contact_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let user = user_id.to_string();
        let contact = contact_id.to_string();
        let at_str = format_datetime(&at);
        let err_id = format!("{user_id}/{contact_id}");

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::SOFT_DELETE_APPLY,
                    rusqlite::params![user, contact, at_str],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ContactApply", err_id))
    }

    async fn get_applies_by_contact_id(&self, contact_id: &str) -> Result<Vec<ContactApply>> {
        let contact = contact_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_APPLIES_BY_CONTACT_ID)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&contact], row_to_apply).map_err(wrap_err)?;

                let mut applies = Vec::new();
                for row_result in rows {
                    applies.push(row_result.map_err(wrap_err)?);
                }
                Ok(applies)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteStore {
    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>> {
        let id_owned = id.to_string();
        let id_for_err = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_USER_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_owned], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "UserProfile", id_for_err))
    }

    async fn create_user(&self, user: &UserProfile) -> Result<()> {
        let id = user.id.clone();
        let nickname = user.nickname.clone();
        let avatar = user.avatar.clone();
        let id_for_err = user.id.clone();

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_USER, rusqlite::params![id, nickname, avatar])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "UserProfile", id_for_err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatgraph_core::social::AddMode;

    fn group(id: &str, owner: &str) -> Group {
        Group::new(id, format!("group {id}"), "", owner, AddMode::Open, "")
    }

    #[tokio::test]
    async fn test_group_create_and_get() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let g = group("G1", "u-1");

        store.create_group(&g).await.unwrap();

        let retrieved = store.get_group("G1").await.unwrap().unwrap();
        assert_eq!(retrieved.id, g.id);
        assert_eq!(retrieved.owner_id, g.owner_id);
        assert_eq!(retrieved.members, g.members);
        assert_eq!(retrieved.member_cnt, 1);
    }

    #[tokio::test]
    async fn test_group_create_duplicate() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let g = group("G1", "u-1");

        store.create_group(&g).await.unwrap();
        let result = store.create_group(&g).await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_group_save_upserts() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let mut g = group("G1", "u-1");

        store.create_group(&g).await.unwrap();

        g.name = "renamed".to_string();
        g.member_cnt = 2;
        store.save_group(&g).await.unwrap();

        let retrieved = store.get_group("G1").await.unwrap().unwrap();
        assert_eq!(retrieved.name, "renamed");
        assert_eq!(retrieved.member_cnt, 2);
    }

    #[tokio::test]
    async fn test_soft_deleted_group_readable_by_id_hidden_from_owner_listing() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        store.create_group(&group("G1", "u-1")).await.unwrap();
        store.create_group(&group("G2", "u-1")).await.unwrap();

        store.soft_delete_group("G1", Utc::now()).await.unwrap();

        let by_id = store.get_group("G1").await.unwrap().unwrap();
        assert!(by_id.deleted_at.is_some());

        let owned = store.get_groups_by_owner("u-1").await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, "G2");
    }

    #[tokio::test]
    async fn test_contact_patch_tombstones_edge() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        store
            .create_contact(&ContactEdge::group_membership("u-1", "G1"))
            .await
            .unwrap();

        store
            .patch_contact("u-1", "G1", Some(ContactStatus::QuitGroup), Some(Utc::now()))
            .await
            .unwrap();

        assert!(store
            .get_contacts_by_contact_id("G1")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_contact_patch_missing_is_noop() {
        let store = SqliteStore::new_in_memory().await.unwrap();

        store
            .patch_contact("u-1", "G1", Some(ContactStatus::Removed), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_session_upsert_and_soft_delete() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let mut session = Session::new("u-1", "G1", "old name", "");

        store.save_session(&session).await.unwrap();

        session.receive_name = "new name".to_string();
        store.save_session(&session).await.unwrap();

        let sessions = store.get_sessions_by_receiver("G1").await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].receive_name, "new name");

        store
            .soft_delete_session("u-1", "G1", Utc::now())
            .await
            .unwrap();
        assert!(store.get_sessions_by_receiver("G1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_apply_lifecycle() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let now = Utc::now();
        let apply = ContactApply {
            user_id: "u-1".to_string(),
            contact_id: "G1".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        store.create_apply(&apply).await.unwrap();
        assert_eq!(store.get_applies_by_contact_id("G1").await.unwrap().len(), 1);

        store.soft_delete_apply("u-1", "G1", Utc::now()).await.unwrap();
        assert!(store.get_applies_by_contact_id("G1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_create_and_get() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let user = UserProfile {
            id: "u-1".to_string(),
            nickname: "ferris".to_string(),
            avatar: "f.png".to_string(),
        };

        store.create_user(&user).await.unwrap();

        let retrieved = store.get_user("u-1").await.unwrap();
        assert_eq!(retrieved, Some(user));
    }

    #[tokio::test]
    async fn test_user_duplicate_create_fails() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let user = UserProfile {
            id: "u-1".to_string(),
            nickname: "ferris".to_string(),
            avatar: String::new(),
        };

        store.create_user(&user).await.unwrap();
        let result = store.create_user(&user).await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }
}
