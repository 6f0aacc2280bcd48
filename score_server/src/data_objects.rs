use chrono::{DateTime, Utc};
use score_engine::db_types::{parse_timestamp, Match, MatchFilter, MatchStatus};
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

/// Body of `POST /matches`.
///
/// Every field is optional at the JSON level so that missing fields are reported as validation errors by the engine
/// rather than as opaque deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMatchRequest {
    #[serde(default)]
    pub team_a: String,
    #[serde(default)]
    pub team_b: String,
    #[serde(default)]
    pub scheduled_at: Option<String>,
}

impl NewMatchRequest {
    pub fn scheduled_at(&self) -> Result<Option<DateTime<Utc>>, ServerError> {
        match self.scheduled_at.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse_timestamp(s).map(Some).map_err(|e| ServerError::ValidationError(e.to_string())),
        }
    }
}

/// Body of `PUT /matches/{id}/score`. Both scores are always supplied together.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreUpdateRequest {
    pub score_a: i32,
    pub score_b: i32,
}

/// Query string of `GET /matches`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl TryFrom<ListQuery> for MatchFilter {
    type Error = ServerError;

    /// A status takes precedence over a date range. A range must have both ends.
    fn try_from(query: ListQuery) -> Result<Self, Self::Error> {
        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        let (status, from, to) = (non_empty(query.status), non_empty(query.from), non_empty(query.to));
        if let Some(status) = status {
            return Ok(MatchFilter::Status(status.parse::<MatchStatus>()?));
        }
        match (from, to) {
            (None, None) => Ok(MatchFilter::All),
            (Some(from), Some(to)) => {
                Ok(MatchFilter::ScheduledBetween { from: parse_timestamp(&from)?, to: parse_timestamp(&to)? })
            },
            _ => Err(ServerError::InvalidQuery("A date range needs both 'from' and 'to'".to_string())),
        }
    }
}

/// Query string of `PUT /matches/{id}/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

/// A match as returned by the API, with its result spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(flatten)]
    pub record: Match,
    pub result: String,
}

impl From<Match> for MatchResponse {
    fn from(record: Match) -> Self {
        let result = record.result_summary();
        Self { record, result }
    }
}
