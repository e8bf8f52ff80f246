//! SQLite storage backend implementation.
//!
//! This module provides a SQLite-based implementation of the repository traits
//! using `rusqlite` for synchronous operations and `tokio-rusqlite` for async wrapping.
//! Soft deletion is a nullable `deleted_at` TEXT column; rows are never
//! physically removed.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteStore;
