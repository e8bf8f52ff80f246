//! Core domain types and traits for the chatgraph project.
//!
//! This crate is backend-agnostic: it defines the social graph entities,
//! the roster codec, cache key builders, and the async traits that storage
//! and cache backends implement. Concrete backends live in the `chatgraph`
//! crate.

pub mod cache;
pub mod outcome;
pub mod social;
pub mod storage;
