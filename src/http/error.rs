//! API error responses
//!
//! Every failure leaves the API as `{ "error": <code>, "message": <text> }`
//! with a status code matching the error kind. Internal failures are logged
//! and answered with a generic message.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::utils::errors::{AuthApiError, ErrorSeverity, HotelConsoleError, StorageError};

const INTERNAL_MESSAGE: &str = "an internal error occurred";

impl HotelConsoleError {
    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            HotelConsoleError::Validation(_) | HotelConsoleError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            HotelConsoleError::Authentication(_) | HotelConsoleError::Token(_) => {
                (StatusCode::UNAUTHORIZED, "unauthorized")
            }
            HotelConsoleError::PermissionDenied(_) => (StatusCode::FORBIDDEN, "forbidden"),
            HotelConsoleError::ProfileNotFound { .. }
            | HotelConsoleError::HotelNotFound { .. }
            | HotelConsoleError::RoomNotFound { .. }
            | HotelConsoleError::ReservationNotFound { .. }
            | HotelConsoleError::PaymentNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            HotelConsoleError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            HotelConsoleError::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            HotelConsoleError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            HotelConsoleError::Storage(StorageError::UnsupportedContentType(_))
            | HotelConsoleError::Storage(StorageError::EmptyFile) => (StatusCode::BAD_REQUEST, "validation_error"),
            HotelConsoleError::AuthApi(AuthApiError::Timeout)
            | HotelConsoleError::Storage(StorageError::Timeout) => (StatusCode::GATEWAY_TIMEOUT, "upstream_timeout"),
            HotelConsoleError::AuthApi(_) | HotelConsoleError::Storage(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            HotelConsoleError::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for HotelConsoleError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, severity = %self.severity(), "Internal error");
            INTERNAL_MESSAGE.to_string()
        } else {
            if self.severity() >= ErrorSeverity::Warning || status.is_server_error() {
                warn!(error = %self, status = status.as_u16(), "Request failed");
            }
            self.to_string()
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

impl From<MultipartError> for HotelConsoleError {
    fn from(e: MultipartError) -> Self {
        HotelConsoleError::InvalidInput(e.body_text())
    }
}
