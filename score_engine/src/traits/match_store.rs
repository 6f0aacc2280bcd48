use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db_types::{Match, MatchStatus, NewMatch};

#[derive(Debug, Clone, Error)]
pub enum MatchStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Match #{0} does not exist")]
    MatchNotFound(i64),
    #[error("Match #{0} is closed and can no longer change")]
    MatchClosed(i64),
}

impl From<sqlx::Error> for MatchStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for MatchStoreError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Self::DatabaseError(format!("Migration failed. {e}"))
    }
}

/// The `MatchStore` trait defines the behaviour that durable storage backends must provide.
///
/// Deciding whether a mutation is legal is the job of [`crate::MatchLifecycleApi`]. Stores only guarantee that a
/// closed match is never written again, since that check has to happen atomically with the write.
///
/// Every listing method returns matches ordered by `scheduled_at`, most recent first. Ties are broken by id, again
/// highest first.
#[allow(async_fn_in_trait)]
pub trait MatchStore {
    /// A description of where the data lives, e.g. the database URL.
    fn url(&self) -> &str;

    /// Persists a brand-new match and returns it with its store-assigned id.
    async fn save(&self, new_match: NewMatch) -> Result<Match, MatchStoreError>;

    /// Overwrites the mutable fields (scores, status, `updated_at`) of a match that is still in progress.
    ///
    /// Returns [`MatchStoreError::MatchClosed`] if the stored match is already closed, and
    /// [`MatchStoreError::MatchNotFound`] if it has been deleted in the meantime.
    async fn update(&self, record: &Match) -> Result<Match, MatchStoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Match>, MatchStoreError>;

    async fn list_all(&self) -> Result<Vec<Match>, MatchStoreError>;

    async fn list_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, MatchStoreError>;

    /// Lists the matches scheduled between `from` and `to`, inclusive.
    async fn list_by_scheduled_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Match>, MatchStoreError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, MatchStoreError>;

    /// Deletes the match. Deleting a match that does not exist is not an error.
    async fn delete_by_id(&self, id: i64) -> Result<(), MatchStoreError>;

    async fn count_all(&self) -> Result<i64, MatchStoreError>;

    async fn count_by_status(&self, status: MatchStatus) -> Result<i64, MatchStoreError>;

    /// Closes the underlying connections.
    async fn close(&mut self) -> Result<(), MatchStoreError> {
        Ok(())
    }
}
