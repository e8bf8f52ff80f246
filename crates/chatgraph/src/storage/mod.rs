//! Storage backend implementations.

#[cfg(feature = "inmemory")]
mod inmemory;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
