//! HTTP response rendering for PortalError

use super::types::PortalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// Standard error response format
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}

impl PortalError {
    /// Status code and stable machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            PortalError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            PortalError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            PortalError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            PortalError::RateLimit(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            PortalError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            PortalError::Alert(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ALERT_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Client-facing message; infrastructure failures stay opaque
    fn public_message(&self) -> String {
        match self {
            PortalError::Database(_) => "Database operation failed".to_string(),
            PortalError::Storage(_) => "Storage operation failed".to_string(),
            PortalError::RateLimit(_) | PortalError::Validation(_) => self.to_string(),
            _ => "An internal error occurred".to_string(),
        }
    }

    /// Build the JSON error body, optionally tagged with a request id
    pub fn to_error_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (_, code) = self.status_and_code();
        ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.public_message(),
                timestamp: chrono::Utc::now().timestamp(),
                request_id,
            },
        }
    }
}

impl ResponseError for PortalError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_error_response(None))
    }
}
