use std::time::Duration;

use log::*;
use score_engine::MemoryCache;
use tokio::task::JoinHandle;

/// Starts the cache purge worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Expired entries are already ignored on read. This just stops them piling up for matches nobody asks about.
pub fn start_cache_purge_worker(cache: MemoryCache, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(period.max(Duration::from_secs(1)));
        info!("💾️ Cache purge worker started");
        loop {
            timer.tick().await;
            let purged = cache.purge_expired();
            trace!("💾️ Cache purge removed {purged} entries. {} remain.", cache.len());
        }
    })
}
