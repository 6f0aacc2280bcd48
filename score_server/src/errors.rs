use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use score_engine::{db_types::ConversionError, MatchLifecycleError, MatchStoreError};
use thiserror::Error;

const BACKEND_FAILURE_MESSAGE: &str = "The server could not complete the request. Please try again later.";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidState(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<MatchLifecycleError> for ServerError {
    fn from(e: MatchLifecycleError) -> Self {
        match e {
            MatchLifecycleError::Validation(_) => Self::ValidationError(e.to_string()),
            MatchLifecycleError::NotFound(_) => Self::NoRecordFound(e.to_string()),
            MatchLifecycleError::InvalidState { .. } => Self::InvalidState(e.to_string()),
            MatchLifecycleError::CollaboratorUnavailable(_) => {
                // Logged only. Never part of the response body.
                error!("💻️ Backend failure. {e}");
                Self::BackendError(BACKEND_FAILURE_MESSAGE.to_string())
            },
        }
    }
}

impl From<MatchStoreError> for ServerError {
    fn from(e: MatchStoreError) -> Self {
        Self::InitializeError(e.to_string())
    }
}

impl From<ConversionError> for ServerError {
    fn from(e: ConversionError) -> Self {
        Self::InvalidQuery(e.to_string())
    }
}

#[cfg(test)]
mod test {
    use score_engine::db_types::MatchStatus;

    use super::*;

    #[test]
    fn lifecycle_errors_map_to_status_codes() {
        let cases = [
            (MatchLifecycleError::Validation("team_a must not be blank".into()), StatusCode::BAD_REQUEST),
            (MatchLifecycleError::NotFound(9), StatusCode::NOT_FOUND),
            (
                MatchLifecycleError::InvalidState { id: 1, status: MatchStatus::Closed, reason: "Closed".into() },
                StatusCode::BAD_REQUEST,
            ),
            (MatchLifecycleError::CollaboratorUnavailable("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status_code(), status);
        }
    }

    #[test]
    fn backend_failures_hide_their_cause() {
        let err = ServerError::from(MatchLifecycleError::CollaboratorUnavailable("disk I/O error at page 12".into()));
        assert!(!err.to_string().contains("disk"));
        assert!(err.to_string().contains(BACKEND_FAILURE_MESSAGE));
    }
}
