use thiserror::Error;

use crate::db_types::Match;

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("The cache is not available. {0}")]
    Unavailable(String),
}

/// A non-authoritative cache of match snapshots, keyed by match id.
///
/// Entries may expire or vanish at any time. A miss only costs a trip to the [`crate::traits::MatchStore`].
#[allow(async_fn_in_trait)]
pub trait ResultCache {
    async fn put(&self, record: &Match) -> Result<(), CacheError>;

    async fn get(&self, id: i64) -> Result<Option<Match>, CacheError>;

    async fn delete(&self, id: i64) -> Result<(), CacheError>;

    async fn clear(&self) -> Result<(), CacheError>;

    fn is_available(&self) -> bool;
}
