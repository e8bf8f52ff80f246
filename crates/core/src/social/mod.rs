//! Social graph domain model.
//!
//! Groups, contact edges, sessions, and join applications, plus the
//! roster codec and the read-side projection types.

pub mod projections;
pub mod roster;
pub mod types;

pub use projections::{GroupInfo, GroupMember, GroupSummary};
pub use roster::{decode_roster, encode_roster, RosterError};
pub use types::{
    AddMode, ContactApply, ContactEdge, ContactKind, ContactStatus, Group, GroupStatus, Session,
    UserProfile,
};
