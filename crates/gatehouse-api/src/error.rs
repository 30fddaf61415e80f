//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use gatehouse_core::error::{AppError, ErrorKind};

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable error code.
    pub error: String,
}

/// HTTP-facing wrapper around [`AppError`].
///
/// Handlers return `Result<_, ApiError>`; `?` converts any `AppError`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = match &err.kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Conflict => (StatusCode::BAD_REQUEST, "DUPLICATE_IDENTITY"),
            ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            ErrorKind::Storage => {
                tracing::error!(error = %err.message, "Persistence failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_FAILURE")
            }
            ErrorKind::Internal | ErrorKind::Configuration | ErrorKind::Serialization => {
                tracing::error!(error = %err.message, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        // Internal details stay in the log.
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            err.message
        };

        let body = ApiErrorResponse {
            success: false,
            message,
            error: error_code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(AppError::validation("short")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::conflict("taken")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::authentication("no")), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::storage("disk full")), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of(AppError::internal("bug")), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
