use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl From<core_types::CoreError> for AppError {
    fn from(err: core_types::CoreError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(DbError::NotFound) => {
                (StatusCode::NOT_FOUND, "File not found".to_string())
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::BadRequest(message) => {
                tracing::warn!(%message, "Rejected request.");
                (StatusCode::BAD_REQUEST, message)
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
