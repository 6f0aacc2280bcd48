//! `SqliteDatabase` is the durable [`MatchStore`] backend.
//!
//! Each call acquires a connection from the pool and hands it to the query functions in [`super::db::matches`].
//! Writes run inside a transaction that is committed before the call returns.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{migrate, SqlitePool};

use super::db::{db_url, matches, new_pool};
use crate::{
    db_types::{Match, MatchFilter, MatchStatus, NewMatch},
    traits::{MatchStore, MatchStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({})", self.url)
    }
}

impl MatchStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn save(&self, new_match: NewMatch) -> Result<Match, MatchStoreError> {
        let mut tx = self.pool.begin().await?;
        let record = matches::insert_match(new_match, &mut *tx).await?;
        tx.commit().await?;
        Ok(record)
    }

    async fn update(&self, record: &Match) -> Result<Match, MatchStoreError> {
        let mut tx = self.pool.begin().await?;
        let record = matches::update_match(record, &mut *tx).await?;
        tx.commit().await?;
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Match>, MatchStoreError> {
        let mut conn = self.pool.acquire().await?;
        matches::fetch_match_by_id(id, &mut conn).await
    }

    async fn list_all(&self) -> Result<Vec<Match>, MatchStoreError> {
        let mut conn = self.pool.acquire().await?;
        matches::fetch_matches(MatchFilter::All, &mut conn).await
    }

    async fn list_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, MatchStoreError> {
        let mut conn = self.pool.acquire().await?;
        matches::fetch_matches(MatchFilter::Status(status), &mut conn).await
    }

    async fn list_by_scheduled_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Match>, MatchStoreError> {
        let mut conn = self.pool.acquire().await?;
        matches::fetch_matches(MatchFilter::ScheduledBetween { from, to }, &mut conn).await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, MatchStoreError> {
        let mut conn = self.pool.acquire().await?;
        matches::match_exists(id, &mut conn).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), MatchStoreError> {
        let mut conn = self.pool.acquire().await?;
        matches::delete_match(id, &mut conn).await
    }

    async fn count_all(&self) -> Result<i64, MatchStoreError> {
        let mut conn = self.pool.acquire().await?;
        matches::count_matches(None, &mut conn).await
    }

    async fn count_by_status(&self, status: MatchStatus) -> Result<i64, MatchStoreError> {
        let mut conn = self.pool.acquire().await?;
        matches::count_matches(Some(status), &mut conn).await
    }

    async fn close(&mut self) -> Result<(), MatchStoreError> {
        self.pool.close().await;
        info!("🗃️ Closed connection pool for {}", self.url);
        Ok(())
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `SCORE_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool for {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Brings the schema up to date with the migrations embedded in this crate.
    pub async fn run_migrations(&self) -> Result<(), MatchStoreError> {
        migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete for {}", self.url);
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
