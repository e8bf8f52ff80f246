//! Row-to-entity conversions and timestamp formatting.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

use chatgraph_core::social::{
    AddMode, ContactApply, ContactEdge, ContactKind, ContactStatus, Group, GroupStatus, Session,
    UserProfile,
};

/// Formats a timestamp for storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_datetime(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn get_datetime(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let value: String = row.get(idx)?;
    parse_datetime(idx, &value)
}

fn get_optional_datetime(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let value: Option<String> = row.get(idx)?;
    value.map(|v| parse_datetime(idx, &v)).transpose()
}

fn invalid_enum(idx: usize, value: i64) -> rusqlite::Error {
    rusqlite::Error::IntegralValueOutOfRange(idx, value)
}

pub fn row_to_group(row: &Row<'_>) -> rusqlite::Result<Group> {
    let add_mode_raw: i64 = row.get(5)?;
    let status_raw: i64 = row.get(7)?;

    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
        notice: row.get(2)?,
        owner_id: row.get(3)?,
        member_cnt: row.get(4)?,
        add_mode: AddMode::from_i8(add_mode_raw as i8).ok_or_else(|| invalid_enum(5, add_mode_raw))?,
        avatar: row.get(6)?,
        status: GroupStatus::from_i8(status_raw as i8).ok_or_else(|| invalid_enum(7, status_raw))?,
        members: row.get(8)?,
        created_at: get_datetime(row, 9)?,
        updated_at: get_datetime(row, 10)?,
        deleted_at: get_optional_datetime(row, 11)?,
    })
}

pub fn row_to_contact(row: &Row<'_>) -> rusqlite::Result<ContactEdge> {
    let kind_raw: i64 = row.get(2)?;
    let status_raw: i64 = row.get(3)?;

    let kind = match kind_raw {
        0 => ContactKind::User,
        1 => ContactKind::Group,
        other => return Err(invalid_enum(2, other)),
    };
    let status = match status_raw {
        0 => ContactStatus::Normal,
        1 => ContactStatus::QuitGroup,
        2 => ContactStatus::Removed,
        other => return Err(invalid_enum(3, other)),
    };

    Ok(ContactEdge {
        user_id: row.get(0)?,
        contact_id: row.get(1)?,
        kind,
        status,
        created_at: get_datetime(row, 4)?,
        updated_at: get_datetime(row, 5)?,
        deleted_at: get_optional_datetime(row, 6)?,
    })
}

/// Storage value for a contact kind.
pub fn contact_kind_to_i64(kind: ContactKind) -> i64 {
    match kind {
        ContactKind::User => 0,
        ContactKind::Group => 1,
    }
}

/// Storage value for a contact status.
pub fn contact_status_to_i64(status: ContactStatus) -> i64 {
    match status {
        ContactStatus::Normal => 0,
        ContactStatus::QuitGroup => 1,
        ContactStatus::Removed => 2,
    }
}

pub fn row_to_session(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        send_id: row.get(0)?,
        receive_id: row.get(1)?,
        receive_name: row.get(2)?,
        avatar: row.get(3)?,
        created_at: get_datetime(row, 4)?,
        updated_at: get_datetime(row, 5)?,
        deleted_at: get_optional_datetime(row, 6)?,
    })
}

pub fn row_to_apply(row: &Row<'_>) -> rusqlite::Result<ContactApply> {
    Ok(ContactApply {
        user_id: row.get(0)?,
        contact_id: row.get(1)?,
        created_at: get_datetime(row, 2)?,
        updated_at: get_datetime(row, 3)?,
        deleted_at: get_optional_datetime(row, 4)?,
    })
}

pub fn row_to_user(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        id: row.get(0)?,
        nickname: row.get(1)?,
        avatar: row.get(2)?,
    })
}
