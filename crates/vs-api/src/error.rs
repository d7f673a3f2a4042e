//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vs_client::DispatchError;

/// Message returned to callers when a device command fails
pub const DEVICE_FAILURE_MESSAGE: &str = "failed to make request to device";

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 500 Internal Server Error
    Internal(String),
    /// 503 Service Unavailable
    ServiceUnavailable(String),
    /// 504 Gateway Timeout
    GatewayTimeout(String),
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "gateway_timeout", msg),
        };

        if status.is_server_error() {
            tracing::error!(error = error_type, %message, "API error");
        } else if status.is_client_error() {
            tracing::debug!(error = error_type, %message, "API client error");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Device failures never expose protocol details to the caller; the
/// specifics are logged where the request was made.
impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        let message = DEVICE_FAILURE_MESSAGE.to_string();
        match err {
            DispatchError::Closed => ApiError::ServiceUnavailable(message),
            DispatchError::Timeout => ApiError::GatewayTimeout(message),
            DispatchError::Abandoned | DispatchError::Command(_) => ApiError::Internal(message),
        }
    }
}
