use serde::{Deserialize, Serialize};

use crate::db_types::Match;

/// Name of the exchange that lifecycle events are published on.
pub const EVENT_EXCHANGE: &str = "football.matches";

/// An event about a single match. The payload is always the full snapshot after the change.
pub trait MatchEvent: Clone + Send + Sync + 'static {
    const ROUTING_KEY: &'static str;

    fn snapshot(&self) -> &Match;

    fn to_message(&self) -> EventMessage {
        EventMessage {
            exchange: EVENT_EXCHANGE.to_string(),
            routing_key: Self::ROUTING_KEY.to_string(),
            payload: self.snapshot().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCreatedEvent {
    pub record: Match,
}

impl MatchCreatedEvent {
    pub fn new(record: Match) -> Self {
        Self { record }
    }
}

impl MatchEvent for MatchCreatedEvent {
    const ROUTING_KEY: &'static str = "match.created";

    fn snapshot(&self) -> &Match {
        &self.record
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdatedEvent {
    pub record: Match,
}

impl ScoreUpdatedEvent {
    pub fn new(record: Match) -> Self {
        Self { record }
    }
}

impl MatchEvent for ScoreUpdatedEvent {
    const ROUTING_KEY: &'static str = "match.score.updated";

    fn snapshot(&self) -> &Match {
        &self.record
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchClosedEvent {
    pub record: Match,
}

impl MatchClosedEvent {
    pub fn new(record: Match) -> Self {
        Self { record }
    }
}

impl MatchEvent for MatchClosedEvent {
    const ROUTING_KEY: &'static str = "match.closed";

    fn snapshot(&self) -> &Match {
        &self.record
    }
}

/// The wire form of an event, as handed to external consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    pub exchange: String,
    pub routing_key: String,
    pub payload: Match,
}
