use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{TimeZone, Utc};
use futures_util::FutureExt;
use log::*;
use score_engine::{
    events::{EventHandlers, EventHooks, MatchEvent},
    InMemoryDatabase,
    MatchLifecycleApi,
    MemoryCache,
};

#[derive(Default, Clone)]
struct EventLog {
    seen: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    fn record<E: MatchEvent>(&self, event: &E) {
        let s = event.snapshot();
        let entry = format!("{} #{} {}:{}", E::ROUTING_KEY, s.id, s.score_a, s.score_b);
        info!("🪝️ {entry}");
        self.seen.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        let mut entries = self.seen.lock().unwrap().clone();
        entries.sort();
        entries
    }
}

fn recording_hooks(log: &EventLog) -> EventHooks {
    let mut hooks = EventHooks::default();
    let l = log.clone();
    hooks.on_match_created(move |ev| {
        l.record(&ev);
        Box::pin(async {}) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let l = log.clone();
    hooks.on_score_updated(move |ev| {
        l.record(&ev);
        async {}.boxed()
    });
    let l = log.clone();
    hooks.on_match_closed(move |ev| {
        l.record(&ev);
        async {}.boxed()
    });
    hooks
}

async fn wait_for(log: &EventLog, count: usize) {
    for _ in 0..100 {
        if log.entries().len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn every_mutation_publishes_one_event() {
    let _ = env_logger::try_init();
    let log = EventLog::default();
    let handlers = EventHandlers::new(10, recording_hooks(&log));
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let api = MatchLifecycleApi::new(InMemoryDatabase::new(), MemoryCache::default(), producers);

    let kickoff = Utc.with_ymd_and_hms(2024, 6, 14, 19, 0, 0).unwrap();
    let m = api.create("Alpha", "Beta", Some(kickoff)).await.unwrap();
    api.update_score(m.id, 1, 0).await.unwrap();
    api.close(m.id).await.unwrap();
    // Rejected operations publish nothing
    assert!(api.close(m.id).await.is_err());
    assert!(api.update_score(m.id, 2, 0).await.is_err());
    api.get_by_id(m.id).await.unwrap();
    api.remove(m.id).await.unwrap();

    wait_for(&log, 3).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(log.entries(), vec!["match.closed #1 1:0", "match.created #1 0:0", "match.score.updated #1 1:0"]);
}

#[tokio::test]
async fn several_hooks_per_event() {
    let first = EventLog::default();
    let second = EventLog::default();
    let mut hooks = recording_hooks(&first);
    let l = second.clone();
    hooks.on_match_created(move |ev| {
        l.record(&ev);
        async {}.boxed()
    });
    let handlers = EventHandlers::new(10, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let api = MatchLifecycleApi::new(InMemoryDatabase::new(), MemoryCache::default(), producers);

    let kickoff = Utc.with_ymd_and_hms(2024, 6, 14, 19, 0, 0).unwrap();
    api.create("Alpha", "Beta", Some(kickoff)).await.unwrap();
    wait_for(&first, 1).await;
    wait_for(&second, 1).await;
    assert_eq!(first.entries(), vec!["match.created #1 0:0"]);
    assert_eq!(second.entries(), vec!["match.created #1 0:0"]);
}

#[tokio::test]
async fn a_stalled_consumer_does_not_block_the_api() {
    let mut hooks = EventHooks::default();
    hooks.on_match_created(|_| tokio::time::sleep(Duration::from_secs(3600)).boxed());
    let handlers = EventHandlers::new(1, hooks);
    let producers = handlers.producers();
    // The handlers are never started, so the channel fills after one event.
    let api = MatchLifecycleApi::new(InMemoryDatabase::new(), MemoryCache::default(), producers);
    let kickoff = Utc.with_ymd_and_hms(2024, 6, 14, 19, 0, 0).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), async {
        for _ in 0..5 {
            api.create("Alpha", "Beta", Some(kickoff)).await.unwrap();
        }
    })
    .await;
    assert!(result.is_ok());
    assert_eq!(api.stats_summary().await.unwrap().total, 5);
    drop(handlers);
}
