use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::stylist::StylistError;

/// Message shown whenever a recommendation cannot be produced, whatever the cause.
pub const RECOMMENDATION_UNAVAILABLE_MESSAGE: &str =
    "We couldn't put together a look right now. Please try again in a moment.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Recommendation unavailable: {0}")]
    RecommendationUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StylistError> for AppError {
    fn from(err: StylistError) -> Self {
        match err {
            StylistError::InvalidRequest(msg) => AppError::Validation(msg),
            StylistError::Unavailable(cause) => AppError::RecommendationUnavailable(cause),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::RecommendationUnavailable(cause) => {
                tracing::warn!("Recommendation unavailable: {cause}");
                (
                    StatusCode::BAD_GATEWAY,
                    "RECOMMENDATION_UNAVAILABLE",
                    RECOMMENDATION_UNAVAILABLE_MESSAGE.to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
