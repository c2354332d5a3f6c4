use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

use crate::db::StoreError;

/// Failures of the try-on lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum TryOnError {
    /// A required input was missing or blank. The message names the field.
    #[error("{0}")]
    Validation(String),

    #[error("Try-on result not found: {0}")]
    NotFound(String),

    /// The record exists but carries no generated image.
    #[error("Try-on image not available for {0}")]
    ArtifactUnavailable(Uuid),

    /// The external job failed or produced nothing usable.
    #[error("Failed to generate try-on: {0}")]
    Generation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error type returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    TryOn(#[from] TryOnError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::TryOn(TryOnError::Store(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            AppError::TryOn(err) => match err {
                TryOnError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                TryOnError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Try-on result not found".to_string(),
                ),
                TryOnError::ArtifactUnavailable(_) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Try-on image not available".to_string(),
                ),
                TryOnError::Generation(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_FAILED",
                    err.to_string(),
                ),
                TryOnError::Store(store_err) => {
                    tracing::error!(error = %store_err, "Record store error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Internal server error".to_string(),
                    )
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "detail": detail,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
