use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::MovieId;
use crate::services::ranking::RankingError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid user ID: {0}")]
    InvalidUser(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Movie {0} has no catalog entry")]
    InconsistentCatalog(MovieId),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<RankingError> for AppError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::InvalidUser(user_id) => AppError::InvalidUser(user_id),
            RankingError::MissingCatalogEntry(movie_id) => AppError::InconsistentCatalog(movie_id),
            RankingError::NonFiniteScore(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidUser(_) | AppError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::InconsistentCatalog(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Startup-time failures building the catalog or a scorer from external
/// sources. Fatal: the process refuses to serve rather than run with
/// partial data.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV data in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("malformed model file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid data in {path}: {reason}")]
    Invalid { path: String, reason: String },
}
