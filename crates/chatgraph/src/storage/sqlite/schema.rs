//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite store.
//! Pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Groups table; members holds the JSON roster blob
CREATE TABLE IF NOT EXISTS groups (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    notice TEXT NOT NULL,
    owner_id TEXT NOT NULL,
    member_cnt INTEGER NOT NULL,
    add_mode INTEGER NOT NULL,
    avatar TEXT NOT NULL,
    status INTEGER NOT NULL,
    members BLOB NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

-- Contact edges table
CREATE TABLE IF NOT EXISTS contacts (
    user_id TEXT NOT NULL,
    contact_id TEXT NOT NULL,
    kind INTEGER NOT NULL,
    status INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT,
    PRIMARY KEY (user_id, contact_id)
);

-- Conversation sessions table
CREATE TABLE IF NOT EXISTS sessions (
    send_id TEXT NOT NULL,
    receive_id TEXT NOT NULL,
    receive_name TEXT NOT NULL,
    avatar TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT,
    PRIMARY KEY (send_id, receive_id)
);

-- Join applications table
CREATE TABLE IF NOT EXISTS applies (
    user_id TEXT NOT NULL,
    contact_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT,
    PRIMARY KEY (user_id, contact_id)
);

-- User profiles table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    nickname TEXT NOT NULL,
    avatar TEXT NOT NULL
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_groups_owner_id ON groups(owner_id);
CREATE INDEX IF NOT EXISTS idx_contacts_contact_id ON contacts(contact_id);
CREATE INDEX IF NOT EXISTS idx_sessions_receive_id ON sessions(receive_id);
CREATE INDEX IF NOT EXISTS idx_applies_contact_id ON applies(contact_id);
"#;

// Group queries
pub const INSERT_GROUP: &str = r#"
INSERT INTO groups (id, name, notice, owner_id, member_cnt, add_mode, avatar, status, members, created_at, updated_at, deleted_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
"#;

pub const UPSERT_GROUP: &str = r#"
INSERT INTO groups (id, name, notice, owner_id, member_cnt, add_mode, avatar, status, members, created_at, updated_at, deleted_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
ON CONFLICT(id) DO UPDATE SET
    name = excluded.name,
    notice = excluded.notice,
    owner_id = excluded.owner_id,
    member_cnt = excluded.member_cnt,
    add_mode = excluded.add_mode,
    avatar = excluded.avatar,
    status = excluded.status,
    members = excluded.members,
    updated_at = excluded.updated_at,
    deleted_at = excluded.deleted_at
"#;

pub const SELECT_GROUP_BY_ID: &str = r#"
SELECT id, name, notice, owner_id, member_cnt, add_mode, avatar, status, members, created_at, updated_at, deleted_at
FROM groups
WHERE id = ?1
"#;

pub const SELECT_GROUPS_BY_OWNER: &str = r#"
SELECT id, name, notice, owner_id, member_cnt, add_mode, avatar, status, members, created_at, updated_at, deleted_at
FROM groups
WHERE owner_id = ?1 AND deleted_at IS NULL
ORDER BY created_at DESC
"#;

pub const SOFT_DELETE_GROUP: &str = r#"
UPDATE groups
SET deleted_at = ?2, updated_at = ?2
WHERE id = ?1 AND deleted_at IS NULL
"#;

// Contact queries
pub const UPSERT_CONTACT: &str = r#"
INSERT OR REPLACE INTO contacts (user_id, contact_id, kind, status, created_at, updated_at, deleted_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const PATCH_CONTACT: &str = r#"
UPDATE contacts
SET status = COALESCE(?3, status),
    deleted_at = COALESCE(?4, deleted_at),
    updated_at = ?5
WHERE user_id = ?1 AND contact_id = ?2 AND deleted_at IS NULL
"#;

pub const SELECT_CONTACTS_BY_CONTACT_ID: &str = r#"
SELECT user_id, contact_id, kind, status, created_at, updated_at, deleted_at
FROM contacts
WHERE contact_id = ?1 AND deleted_at IS NULL
"#;

// Session queries
pub const UPSERT_SESSION: &str = r#"
INSERT OR REPLACE INTO sessions (send_id, receive_id, receive_name, avatar, created_at, updated_at, deleted_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SOFT_DELETE_SESSION: &str = r#"
UPDATE sessions
SET deleted_at = ?3, updated_at = ?3
WHERE send_id = ?1 AND receive_id = ?2 AND deleted_at IS NULL
"#;

pub const SELECT_SESSIONS_BY_RECEIVER: &str = r#"
SELECT send_id, receive_id, receive_name, avatar, created_at, updated_at, deleted_at
FROM sessions
WHERE receive_id = ?1 AND deleted_at IS NULL
"#;

// Apply queries
pub const UPSERT_APPLY: &str = r#"
INSERT OR REPLACE INTO applies (user_id, contact_id, created_at, updated_at, deleted_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SOFT_DELETE_APPLY: &str = r#"
UPDATE applies
SET deleted_at = ?3, updated_at = ?3
WHERE user_id = ?1 AND contact_id = ?2 AND deleted_at IS NULL
"#;

pub const SELECT_APPLIES_BY_CONTACT_ID: &str = r#"
SELECT user_id, contact_id, created_at, updated_at, deleted_at
FROM applies
WHERE contact_id = ?1 AND deleted_at IS NULL
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, nickname, avatar)
VALUES (?1, ?2, ?3)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, nickname, avatar
FROM users
WHERE id = ?1
"#;
