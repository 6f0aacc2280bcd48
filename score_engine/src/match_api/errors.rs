use thiserror::Error;

use crate::{db_types::MatchStatus, traits::MatchStoreError};

#[derive(Debug, Clone, Error)]
pub enum MatchLifecycleError {
    #[error("Invalid request. {0}")]
    Validation(String),
    #[error("Match #{0} was not found")]
    NotFound(i64),
    #[error("Match #{id} is {status}. {reason}")]
    InvalidState { id: i64, status: MatchStatus, reason: String },
    #[error("The match store is unavailable. {0}")]
    CollaboratorUnavailable(String),
}

impl From<MatchStoreError> for MatchLifecycleError {
    fn from(e: MatchStoreError) -> Self {
        match e {
            MatchStoreError::MatchNotFound(id) => Self::NotFound(id),
            MatchStoreError::MatchClosed(id) => Self::InvalidState {
                id,
                status: MatchStatus::Closed,
                reason: "The match was closed by another request".to_string(),
            },
            e => Self::CollaboratorUnavailable(e.to_string()),
        }
    }
}
