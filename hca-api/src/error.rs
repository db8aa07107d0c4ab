//! Route-level error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hca_db::DbError;
use serde_json::json;
use thiserror::Error;

/// Errors a route handler can surface to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A path parameter was not a YYYY-MM-DD calendar date.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A temperature range matched zero observations.
    #[error("no temperature observations match the requested date range")]
    NoObservations,

    /// The blocking query task was cancelled or panicked.
    #[error("query task failed")]
    TaskFailed,

    #[error(transparent)]
    Db(#[from] DbError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            ApiError::NoObservations => StatusCode::NOT_FOUND,
            ApiError::TaskFailed | ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Store failures are logged with detail but reported generically;
        // client-caused errors echo their message.
        let message = match &self {
            ApiError::Db(err) => {
                log::error!("database error while handling request: {err}");
                "internal server error".to_string()
            }
            ApiError::TaskFailed => {
                log::error!("blocking query task failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
