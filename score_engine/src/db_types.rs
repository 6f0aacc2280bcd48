use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------     MatchStatus       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// The match is being played. Scores may still change.
    InProgress,
    /// The match is over. This state is terminal and the score is frozen.
    Closed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::InProgress => "IN_PROGRESS",
            MatchStatus::Closed => "CLOSED",
        }
    }
}

impl Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid match status: {0}")]
pub struct ConversionError(pub String);

impl FromStr for MatchStatus {
    type Err = ConversionError;

    /// Status names are matched case-insensitively, so `closed`, `Closed` and `CLOSED` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "IN_PROGRESS" => Ok(Self::InProgress),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Match          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    pub team_a: String,
    pub team_b: String,
    pub score_a: i32,
    pub score_b: i32,
    pub status: MatchStatus,
    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// `None` until the score or status changes for the first time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Match {
    pub fn is_in_progress(&self) -> bool {
        self.status == MatchStatus::InProgress
    }

    pub fn is_closed(&self) -> bool {
        self.status == MatchStatus::Closed
    }

    /// A human-readable summary of the scoreline, e.g. "Alpha won 3 x 1" or "Draw: 2 x 2".
    pub fn result_summary(&self) -> String {
        use std::cmp::Ordering::*;
        match self.score_a.cmp(&self.score_b) {
            Greater => format!("{} won {} x {}", self.team_a, self.score_a, self.score_b),
            Less => format!("{} won {} x {}", self.team_b, self.score_b, self.score_a),
            Equal => format!("Draw: {} x {}", self.score_a, self.score_b),
        }
    }
}

impl Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Match #{} [{} {} x {} {}] ({})",
            self.id, self.team_a, self.score_a, self.score_b, self.team_b, self.status
        )
    }
}

//--------------------------------------       NewMatch        ---------------------------------------------------------
/// A match that has passed validation but has not been assigned an id by the store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub team_a: String,
    pub team_b: String,
    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl NewMatch {
    pub fn new<S: Into<String>>(team_a: S, team_b: S, scheduled_at: DateTime<Utc>) -> Self {
        Self { team_a: team_a.into(), team_b: team_b.into(), scheduled_at, created_at: Utc::now() }
    }

    /// The record a store creates for this match once it has chosen an id.
    pub fn into_match(self, id: i64) -> Match {
        Match {
            id,
            team_a: self.team_a,
            team_b: self.team_b,
            score_a: 0,
            score_b: 0,
            status: MatchStatus::InProgress,
            scheduled_at: self.scheduled_at,
            created_at: self.created_at,
            updated_at: None,
        }
    }
}

//--------------------------------------      MatchFilter      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchFilter {
    #[default]
    All,
    Status(MatchStatus),
    /// Matches scheduled in `[from, to]`, both ends inclusive.
    ScheduledBetween { from: DateTime<Utc>, to: DateTime<Utc> },
}

impl Display for MatchFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchFilter::All => write!(f, "all"),
            MatchFilter::Status(s) => write!(f, "status={s}"),
            MatchFilter::ScheduledBetween { from, to } => write!(f, "scheduled in [{from}, {to}]"),
        }
    }
}

//--------------------------------------     StatsSummary      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total: i64,
    pub in_progress: i64,
    pub closed: i64,
}

impl Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Total: {} | In progress: {} | Closed: {}", self.total, self.in_progress, self.closed)
    }
}

//--------------------------------------      Timestamps       ---------------------------------------------------------
pub const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses an RFC 3339 timestamp, or a zone-less `YYYY-MM-DDTHH:MM:SS` timestamp which is taken to be UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ConversionError> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(s, NAIVE_TIMESTAMP_FORMAT).map(|dt| Utc.from_utc_datetime(&dt)))
        .map_err(|e| ConversionError(format!("{s} is not a valid timestamp. {e}")))
}
