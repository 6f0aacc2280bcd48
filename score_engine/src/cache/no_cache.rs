use log::trace;

use crate::{
    db_types::Match,
    traits::{CacheError, ResultCache},
};

/// A cache that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResultCache for NoCache {
    async fn put(&self, record: &Match) -> Result<(), CacheError> {
        trace!("💾️ Caching disabled. Not storing match #{}", record.id);
        Ok(())
    }

    async fn get(&self, _id: i64) -> Result<Option<Match>, CacheError> {
        Ok(None)
    }

    async fn delete(&self, _id: i64) -> Result<(), CacheError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }
}
