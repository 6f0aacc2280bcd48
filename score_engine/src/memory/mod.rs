//! An in-memory [`MatchStore`] backend.
//!
//! Records live in a lock-protected ordered map and disappear when the process exits. Useful for tests and for running
//! the server without a database (`SCORE_DATABASE_URL=memory`).
use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use chrono::{DateTime, Utc};
use log::*;
use tokio::sync::RwLock;

use crate::{
    db_types::{Match, MatchStatus, NewMatch},
    traits::{MatchStore, MatchStoreError},
};

pub const MEMORY_STORE_URL: &str = "memory";

#[derive(Debug, Clone)]
pub struct InMemoryDatabase {
    records: Arc<RwLock<BTreeMap<i64, Match>>>,
    last_id: Arc<AtomicI64>,
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self { records: Arc::new(RwLock::new(BTreeMap::new())), last_id: Arc::new(AtomicI64::new(0)) }
    }

    async fn select<F>(&self, predicate: F) -> Vec<Match>
    where F: Fn(&Match) -> bool {
        let records = self.records.read().await;
        let mut result = records.values().filter(|m| predicate(m)).cloned().collect::<Vec<_>>();
        result.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at).then_with(|| b.id.cmp(&a.id)));
        result
    }
}

impl MatchStore for InMemoryDatabase {
    fn url(&self) -> &str {
        MEMORY_STORE_URL
    }

    async fn save(&self, new_match: NewMatch) -> Result<Match, MatchStoreError> {
        // Ids are never reused, even after a delete.
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = new_match.into_match(id);
        self.records.write().await.insert(id, record.clone());
        trace!("🗃️ Stored match #{id} in memory");
        Ok(record)
    }

    async fn update(&self, record: &Match) -> Result<Match, MatchStoreError> {
        let mut records = self.records.write().await;
        let stored = records.get_mut(&record.id).ok_or(MatchStoreError::MatchNotFound(record.id))?;
        if stored.is_closed() {
            return Err(MatchStoreError::MatchClosed(record.id));
        }
        stored.score_a = record.score_a;
        stored.score_b = record.score_b;
        stored.status = record.status;
        stored.updated_at = record.updated_at;
        Ok(stored.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Match>, MatchStoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Match>, MatchStoreError> {
        Ok(self.select(|_| true).await)
    }

    async fn list_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, MatchStoreError> {
        Ok(self.select(|m| m.status == status).await)
    }

    async fn list_by_scheduled_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Match>, MatchStoreError> {
        Ok(self.select(|m| m.scheduled_at >= from && m.scheduled_at <= to).await)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, MatchStoreError> {
        Ok(self.records.read().await.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), MatchStoreError> {
        self.records.write().await.remove(&id);
        Ok(())
    }

    async fn count_all(&self) -> Result<i64, MatchStoreError> {
        Ok(self.records.read().await.len() as i64)
    }

    async fn count_by_status(&self, status: MatchStatus) -> Result<i64, MatchStoreError> {
        Ok(self.records.read().await.values().filter(|m| m.status == status).count() as i64)
    }
}
