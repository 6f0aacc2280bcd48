use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use log::*;

use super::{cache_key, DEFAULT_CACHE_TTL};
use crate::{
    db_types::Match,
    traits::{CacheError, ResultCache},
};

#[derive(Debug, Clone)]
struct CacheEntry {
    record: Match,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// An in-process cache of match snapshots with a fixed time-to-live.
///
/// Expired entries count as misses and are evicted the next time they are read. Call [`MemoryCache::purge_expired`]
/// to drop them all at once. Clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    entries: Arc<DashMap<i64, CacheEntry>>,
    ttl: Duration,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_TTL))
    }
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entries: Arc::new(DashMap::new()), ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The number of entries held, including any that have expired but not yet been evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!("💾️ Purged {purged} expired cache entries");
        }
        purged
    }
}

impl ResultCache for MemoryCache {
    async fn put(&self, record: &Match) -> Result<(), CacheError> {
        let entry = CacheEntry { record: record.clone(), expires_at: Instant::now() + self.ttl };
        self.entries.insert(record.id, entry);
        trace!("💾️ Cached {}", cache_key(record.id));
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<Match>, CacheError> {
        let now = Instant::now();
        let hit = match self.entries.get(&id) {
            Some(entry) if !entry.is_expired(now) => Some(entry.record.clone()),
            Some(_) => None,
            None => return Ok(None),
        };
        // The read guard is released by now, so removing cannot deadlock on the same shard.
        if hit.is_none() {
            self.entries.remove_if(&id, |_, entry| entry.is_expired(now));
            trace!("💾️ {} has expired", cache_key(id));
        }
        Ok(hit)
    }

    async fn delete(&self, id: i64) -> Result<(), CacheError> {
        self.entries.remove(&id);
        trace!("💾️ Evicted {}", cache_key(id));
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.entries.clear();
        debug!("💾️ Cache cleared");
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}
