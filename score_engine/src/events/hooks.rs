use std::{future::Future, pin::Pin, sync::Arc};

use log::*;

use crate::{
    db_types::Match,
    events::{EventHandler, EventProducer, Handler, MatchClosedEvent, MatchCreatedEvent, MatchEvent, ScoreUpdatedEvent},
};

/// The publishing side of the event system, handed to [`crate::MatchLifecycleApi`].
///
/// Publishing never waits. An event that cannot be queued is logged and dropped, and the `publish_*` methods report
/// how many hooks accepted it.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub match_created_producer: Vec<EventProducer<MatchCreatedEvent>>,
    pub score_updated_producer: Vec<EventProducer<ScoreUpdatedEvent>>,
    pub match_closed_producer: Vec<EventProducer<MatchClosedEvent>>,
}

impl EventProducers {
    pub fn publish_created(&self, record: &Match) -> usize {
        publish_all(&self.match_created_producer, MatchCreatedEvent::new(record.clone()))
    }

    pub fn publish_score_updated(&self, record: &Match) -> usize {
        publish_all(&self.score_updated_producer, ScoreUpdatedEvent::new(record.clone()))
    }

    pub fn publish_closed(&self, record: &Match) -> usize {
        publish_all(&self.match_closed_producer, MatchClosedEvent::new(record.clone()))
    }
}

fn publish_all<E: MatchEvent>(producers: &[EventProducer<E>], event: E) -> usize {
    let delivered = producers.iter().filter(|p| p.publish_event(event.clone())).count();
    if delivered < producers.len() {
        warn!(
            "📬️ {} for match #{} reached {delivered} of {} hooks",
            E::ROUTING_KEY,
            event.snapshot().id,
            producers.len()
        );
    } else {
        trace!("📬️ Published {} for match #{}", E::ROUTING_KEY, event.snapshot().id);
    }
    delivered
}

pub struct EventHandlers {
    pub on_match_created: Vec<EventHandler<MatchCreatedEvent>>,
    pub on_score_updated: Vec<EventHandler<ScoreUpdatedEvent>>,
    pub on_match_closed: Vec<EventHandler<MatchClosedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_match_created = hooks.on_match_created.into_iter().map(|f| EventHandler::new(buffer_size, f)).collect();
        let on_score_updated = hooks.on_score_updated.into_iter().map(|f| EventHandler::new(buffer_size, f)).collect();
        let on_match_closed = hooks.on_match_closed.into_iter().map(|f| EventHandler::new(buffer_size, f)).collect();
        Self { on_match_created, on_score_updated, on_match_closed }
    }

    pub fn producers(&self) -> EventProducers {
        EventProducers {
            match_created_producer: self.on_match_created.iter().map(|h| h.subscribe()).collect(),
            score_updated_producer: self.on_score_updated.iter().map(|h| h.subscribe()).collect(),
            match_closed_producer: self.on_match_closed.iter().map(|h| h.subscribe()).collect(),
        }
    }

    /// Spawns one task per registered hook. Each task exits once all of its producers have been dropped.
    pub async fn start_handlers(self) {
        for handler in self.on_match_created {
            tokio::spawn(handler.start_handler());
        }
        for handler in self.on_score_updated {
            tokio::spawn(handler.start_handler());
        }
        for handler in self.on_match_closed {
            tokio::spawn(handler.start_handler());
        }
    }
}

/// Registration point for event consumers. Several hooks may be registered for the same event.
#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_match_created: Vec<Handler<MatchCreatedEvent>>,
    pub on_score_updated: Vec<Handler<ScoreUpdatedEvent>>,
    pub on_match_closed: Vec<Handler<MatchClosedEvent>>,
}

impl EventHooks {
    pub fn on_match_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(MatchCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_match_created.push(Arc::new(f));
        self
    }

    pub fn on_score_updated<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ScoreUpdatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_score_updated.push(Arc::new(f));
        self
    }

    pub fn on_match_closed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(MatchClosedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_match_closed.push(Arc::new(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on_match_created.is_empty() && self.on_score_updated.is_empty() && self.on_match_closed.is_empty()
    }
}
