//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//!
//! Lookup misses inside the reconciliation sweep are deliberately NOT errors:
//! a post whose bounty tag has no rate definition simply accrues nothing.
//! These variants exist for the administrative and ingestion surfaces, where
//! the caller needs a synchronous verdict.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1003,
///     "message": "invalid rate: per_views must be positive",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server          | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No tracked post exists for the given platform and URL.
    #[error("post not found: {0}")]
    PostNotFound(String),

    /// No rate definition exists for the given key.
    #[error("rate not found: {0}")]
    RateNotFound(String),

    /// No registered social account matches the given owner and platform.
    #[error("account not found for owner {0}")]
    AccountNotFound(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unrecognized platform string.
    #[error("invalid platform: {0}")]
    InvalidPlatform(String),

    /// Rate definition rejected at creation time.
    #[error("invalid rate: {0}")]
    InvalidRate(String),

    /// Payout ledger failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidPlatform(_) => 1002,
            Self::InvalidRate(_) => 1003,
            Self::PostNotFound(_) => 2001,
            Self::RateNotFound(_) => 2002,
            Self::AccountNotFound(_) => 2003,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidPlatform(_) | Self::InvalidRate(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PostNotFound(_) | Self::RateNotFound(_) | Self::AccountNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = GatewayError::InvalidRate("per_views must be positive".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1003);
    }

    #[test]
    fn lookup_misses_map_to_not_found() {
        let err = GatewayError::PostNotFound("https://youtube.com/watch?v=x".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn persistence_errors_map_to_internal() {
        let err = GatewayError::PersistenceError("connection reset".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
