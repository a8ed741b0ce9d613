use axum::http::StatusCode;
use thiserror::Error;

use crate::models::Category;

/// Failures raised by the ledger engine.
///
/// Everything except `MalformedSnapshot` is a caller mistake and is returned
/// as-is. A malformed snapshot is only produced while loading and storage
/// recovers from it by starting with an empty ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid day '{0}': expected one of Monday..Sunday")]
    InvalidDay(String),

    #[error("unknown {category} factor '{id}'")]
    UnknownFactor { category: Category, id: String },

    #[error("factor '{id}' is a check, not a count")]
    KindMismatch { id: String },

    #[error("invalid week key '{0}': expected the YYYY-MM-DD date of a Monday")]
    InvalidWeekKey(String),

    #[error("athlete name must not be empty")]
    EmptyName,

    #[error("malformed ledger snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::MalformedSnapshot(_) => Self::internal(err),
            _ => Self::bad_request(err.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
