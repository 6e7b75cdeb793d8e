//! Application error type shared by every layer.
//!
//! [`AppError`] separates the three outcomes callers must tell apart:
//! bad input, a code with no live record, and a store that could not
//! complete the operation. The HTTP façade maps them to 400, 404 and 503.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to HTTP clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed destination or generator configuration; rejected before any mutation.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The referenced code has no live record.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The persistence backend failed, timed out, or could not allocate a code.
    #[error("{message}")]
    Storage { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }

    /// Shorthand for the "no live record" case.
    pub fn record_not_found(code: &str) -> Self {
        Self::not_found("Short code not found", json!({ "code": code }))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Storage { .. } => (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable"),
        }
    }

    /// Converts the error into its wire representation.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.parts();
        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::Storage { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = %self, "Storage failure surfaced to client");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request("Request validation failed", json!(errors))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        let kind = match &e {
            sqlx::Error::PoolTimedOut => "timeout",
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => "unavailable",
            sqlx::Error::Database(db) if db.is_unique_violation() => "constraint",
            _ => "query",
        };

        AppError::storage(
            "Database error",
            json!({ "backend": "postgres", "kind": kind, "reason": e.to_string() }),
        )
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        let kind = if e.is_timeout() {
            "timeout"
        } else if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
            "unavailable"
        } else {
            "command"
        };

        AppError::storage(
            "Redis error",
            json!({ "backend": "redis", "kind": kind, "reason": e.to_string() }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::bad_request("bad", json!({})), StatusCode::BAD_REQUEST),
            (AppError::record_not_found("abc123"), StatusCode::NOT_FOUND),
            (
                AppError::storage("down", json!({})),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_info_carries_details() {
        let info = AppError::record_not_found("abc123").to_error_info();

        assert_eq!(info.code, "not_found");
        assert_eq!(info.message, "Short code not found");
        assert_eq!(info.details["code"], "abc123");
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::storage("Unable to allocate a unique code", json!({}));
        assert_eq!(err.to_string(), "Unable to allocate a unique code");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_pool_timeout_maps_to_storage() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        match err {
            AppError::Storage { details, .. } => assert_eq!(details["kind"], "timeout"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
