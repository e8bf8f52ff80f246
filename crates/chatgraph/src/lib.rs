//! Group roster & cache-consistency engine.
//!
//! Backends (storage and cache) are selected at compile time through
//! cargo features and wired together in [`state::AppState`]. The
//! operation surface lives in [`service::GroupService`]; there is no
//! transport layer here, embedding binaries bring their own.

pub mod cache;
pub mod config;
pub mod ids;
pub mod service;
pub mod state;
pub mod storage;
