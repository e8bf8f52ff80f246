//! Group roster operations and cache consistency.
//!
//! The service layer ties the repositories and the cache together:
//! reads go through the cache and repopulate it on a miss, mutations
//! write to the store first and invalidate dependent entries after.

pub mod groups;
pub mod invalidation;
mod read_through;

pub use groups::{CreateGroup, GroupPatch, GroupService};
pub use invalidation::{Invalidator, RosterMutation};
