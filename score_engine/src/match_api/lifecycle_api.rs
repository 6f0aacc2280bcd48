use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    db_types::{Match, MatchFilter, MatchStatus, NewMatch, StatsSummary},
    events::EventProducers,
    match_api::errors::MatchLifecycleError,
    traits::{MatchStore, ResultCache},
};

/// `MatchLifecycleApi` enforces the match state machine and keeps the store, event consumers and cache in step.
///
/// Every mutation follows the same order: write to the store, publish the event, refresh the cache. Only the store
/// write can fail the operation. Publishing and caching failures are logged and otherwise ignored.
pub struct MatchLifecycleApi<B, C> {
    db: B,
    cache: C,
    producers: EventProducers,
}

impl<B, C> Debug for MatchLifecycleApi<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MatchLifecycleApi")
    }
}

impl<B, C> MatchLifecycleApi<B, C> {
    pub fn new(db: B, cache: C, producers: EventProducers) -> Self {
        Self { db, cache, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<B, C> MatchLifecycleApi<B, C>
where
    B: MatchStore,
    C: ResultCache,
{
    /// Registers a new match. It starts `IN_PROGRESS` at 0 x 0.
    ///
    /// Team names are trimmed and must not be blank. The kick-off time is required.
    pub async fn create(
        &self,
        team_a: &str,
        team_b: &str,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<Match, MatchLifecycleError> {
        let team_a = required_name("team_a", team_a)?;
        let team_b = required_name("team_b", team_b)?;
        let scheduled_at = scheduled_at
            .ok_or_else(|| MatchLifecycleError::Validation("scheduled_at is required".to_string()))?;
        let record = self.db.save(NewMatch::new(team_a, team_b, scheduled_at)).await?;
        info!("⚽️ Created {record}");
        self.producers.publish_created(&record);
        self.refresh_cache(&record).await;
        Ok(record)
    }

    /// Sets both scores of a match in progress. The new scores replace the old ones.
    pub async fn update_score(&self, id: i64, score_a: i32, score_b: i32) -> Result<Match, MatchLifecycleError> {
        if score_a < 0 || score_b < 0 {
            return Err(MatchLifecycleError::Validation(format!(
                "Scores cannot be negative. Got {score_a} x {score_b}"
            )));
        }
        let mut record = self.fetch_in_progress(id, "The score of a closed match cannot change").await?;
        record.score_a = score_a;
        record.score_b = score_b;
        record.updated_at = Some(Utc::now());
        let record = self.db.update(&record).await?;
        info!("⚽️ Score updated: {record}");
        self.producers.publish_score_updated(&record);
        self.refresh_cache(&record).await;
        Ok(record)
    }

    /// Ends a match. Closing is final, and closing a match twice is an error.
    pub async fn close(&self, id: i64) -> Result<Match, MatchLifecycleError> {
        let mut record = self.fetch_in_progress(id, "The match has already been closed").await?;
        record.status = MatchStatus::Closed;
        record.updated_at = Some(Utc::now());
        let record = self.db.update(&record).await?;
        info!("⚽️ Closed {record}. {}", record.result_summary());
        self.producers.publish_closed(&record);
        self.refresh_cache(&record).await;
        Ok(record)
    }

    /// Fetches a match, trying the cache before the store. A store hit is written back to the cache.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Match>, MatchLifecycleError> {
        match self.cache.get(id).await {
            Ok(Some(record)) => {
                trace!("⚽️ Cache hit for match #{id}");
                return Ok(Some(record));
            },
            Ok(None) => trace!("⚽️ Cache miss for match #{id}"),
            Err(e) => warn!("⚽️ Could not read match #{id} from the cache. {e}"),
        }
        let record = self.db.find_by_id(id).await?;
        if let Some(record) = &record {
            self.refresh_cache(record).await;
        }
        Ok(record)
    }

    /// Lists matches, most recently scheduled first. A range whose start is after its end is rejected.
    pub async fn list(&self, filter: MatchFilter) -> Result<Vec<Match>, MatchLifecycleError> {
        let matches = match filter {
            MatchFilter::All => self.db.list_all().await?,
            MatchFilter::Status(status) => self.db.list_by_status(status).await?,
            MatchFilter::ScheduledBetween { from, to } => {
                if from > to {
                    return Err(MatchLifecycleError::Validation(format!(
                        "The start of the range ({from}) is after its end ({to})"
                    )));
                }
                self.db.list_by_scheduled_range(from, to).await?
            },
        };
        debug!("⚽️ {} matches for filter '{filter}'", matches.len());
        Ok(matches)
    }

    /// Deletes a match from the store and then from the cache.
    pub async fn remove(&self, id: i64) -> Result<(), MatchLifecycleError> {
        if !self.db.exists_by_id(id).await? {
            return Err(MatchLifecycleError::NotFound(id));
        }
        self.db.delete_by_id(id).await?;
        info!("⚽️ Removed match #{id}");
        if let Err(e) = self.cache.delete(id).await {
            warn!("⚽️ Match #{id} was removed but may still be cached. {e}");
        }
        Ok(())
    }

    pub async fn stats_summary(&self) -> Result<StatsSummary, MatchLifecycleError> {
        let total = self.db.count_all().await?;
        let in_progress = self.db.count_by_status(MatchStatus::InProgress).await?;
        let closed = self.db.count_by_status(MatchStatus::Closed).await?;
        Ok(StatsSummary { total, in_progress, closed })
    }

    /// Reads the authoritative record from the store and checks that it may still change.
    async fn fetch_in_progress(&self, id: i64, reason: &str) -> Result<Match, MatchLifecycleError> {
        let record = self.db.find_by_id(id).await?.ok_or(MatchLifecycleError::NotFound(id))?;
        if record.is_closed() {
            return Err(MatchLifecycleError::InvalidState { id, status: record.status, reason: reason.to_string() });
        }
        Ok(record)
    }

    async fn refresh_cache(&self, record: &Match) {
        if let Err(e) = self.cache.put(record).await {
            warn!("⚽️ Could not cache match #{}. {e}", record.id);
        }
    }
}

fn required_name(field: &str, value: &str) -> Result<String, MatchLifecycleError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MatchLifecycleError::Validation(format!("{field} must not be blank")));
    }
    Ok(value.to_string())
}
