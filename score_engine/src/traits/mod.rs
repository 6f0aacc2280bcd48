//! # Backend contracts
//!
//! This module defines the interfaces that collaborators of the match lifecycle engine need to expose.
//!
//! * [`MatchStore`] is the authoritative, durable home of match records. Every backend (SQLite, in-memory) implements
//!   it, and exactly one backend is chosen when the process starts.
//! * [`ResultCache`] is a best-effort accelerator for point lookups. It is never treated as the source of truth, and
//!   failures are logged by the engine rather than surfaced to callers.
mod match_store;
mod result_cache;

pub use match_store::{MatchStore, MatchStoreError};
pub use result_cache::{CacheError, ResultCache};
