//! Football score engine
//!
//! This library holds the core logic for tracking football matches: creating them, recording scores and closing them.
//! It knows nothing about HTTP. The `score_server` crate puts a REST surface on top of it.
//!
//! The library is divided into these sections:
//! 1. Domain types ([`mod@db_types`]) shared by every backend and by clients of the engine.
//! 2. Backend contracts ([`mod@traits`]) and their implementations: [`SqliteDatabase`] and [`InMemoryDatabase`] for
//!    storage, [`MemoryCache`] and [`NoCache`] for caching.
//! 3. The public API ([`MatchLifecycleApi`]), which enforces the match state machine.
//!
//! The engine also emits an event whenever a match is created, has its score updated or is closed. A simple actor
//! framework ([`mod@events`]) lets you hook into these events.
pub mod cache;
pub mod db_types;
pub mod events;
mod match_api;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use cache::{MemoryCache, NoCache};
pub use match_api::{errors::MatchLifecycleError, lifecycle_api::MatchLifecycleApi};
pub use memory::InMemoryDatabase;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{CacheError, MatchStore, MatchStoreError, ResultCache};
