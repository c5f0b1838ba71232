use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use critic_core::error::{AppError, FetchError};

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            AppError::InvalidRequest(_) | AppError::SerializationError(_) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            AppError::Fetch(FetchError::InvalidLocation(_) | FetchError::Blocked(_)) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            AppError::Fetch(FetchError::Timeout(_)) | AppError::Timeout(_) => {
                (StatusCode::GATEWAY_TIMEOUT, "timeout")
            }
            AppError::Fetch(_) => (StatusCode::BAD_GATEWAY, "fetch_error"),
            AppError::Extract(_) => (StatusCode::UNPROCESSABLE_ENTITY, "extract_error"),
            AppError::LlmError { .. } => (StatusCode::BAD_GATEWAY, "llm_error"),
            AppError::SearchError(_) => (StatusCode::BAD_GATEWAY, "search_error"),
            AppError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "rate_limit_exceeded"),
            AppError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Generic(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_kind();
        if status.is_server_error() {
            tracing::warn!(error = %self.0, "Request failed");
        }

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.0.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
