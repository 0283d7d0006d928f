use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use pia_service::ServiceError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Unprocessable(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound { .. } | ServiceError::MeasureNotFound { .. } => {
                ApiError::NotFound(e.to_string())
            }
            ServiceError::UnknownReference { .. }
            | ServiceError::InvalidExport(_)
            | ServiceError::MeasureIdsExhausted { .. } => ApiError::BadRequest(e.to_string()),
            ServiceError::Conflict { .. } => ApiError::Conflict(e.to_string()),
            ServiceError::CorruptPayload { .. } => ApiError::Unprocessable(e.to_string()),
            ServiceError::TransientIo(_) => ApiError::Internal(e.to_string()),
        }
    }
}
