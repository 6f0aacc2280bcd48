//! # Match lifecycle API
//!
//! [`lifecycle_api::MatchLifecycleApi`] is the only way matches change state. It is generic over a
//! [`MatchStore`](crate::traits::MatchStore) and a [`ResultCache`](crate::traits::ResultCache), and is assembled once
//! at startup:
//!
//! ```rust,ignore
//! use score_engine::{events::EventProducers, InMemoryDatabase, MatchLifecycleApi, MemoryCache};
//! let api = MatchLifecycleApi::new(InMemoryDatabase::new(), MemoryCache::default(), EventProducers::default());
//! let record = api.create("Alpha", "Beta", Some(kickoff)).await?;
//! let record = api.update_score(record.id, 1, 0).await?;
//! ```
pub mod errors;
pub mod lifecycle_api;
