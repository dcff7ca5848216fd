//! Error types for web handlers.
//!
//! Bridges [`CheckinError`] and request-parsing failures to HTTP responses with
//! a JSON body `{ "code": ..., "message": ... }`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use badge_desk_core::{CheckinError, StoreError};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<BadgeResponse>, AppError> {
///     let outcome = state.desk().check_in(&ticket).await?;
///     Ok(Json(BadgeResponse::from(outcome)))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_SERVER_ERROR")
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message, "SERVICE_UNAVAILABLE")
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Stable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        } else {
            tracing::debug!(status = %self.status, code = %self.code, "Request rejected");
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Map desk failures to HTTP.
///
/// | Error | Status | Code |
/// |---|---|---|
/// | `InvalidInput` | 400 | `INVALID_INPUT` |
/// | `NotFound` | 404 | `TICKET_NOT_FOUND` |
/// | `PermissionDenied` | 403 | `PERMISSION_DENIED` |
/// | `AmbiguousTicket` | 409 | `AMBIGUOUS_TICKET` |
/// | `MissingPrimaryKey` | 500 | `MISSING_USER_ID` |
/// | `Inconsistent` | 500 | `INCONSISTENT_STATE` |
/// | `Render` | 500 | `RENDER_FAILED` |
/// | `Store(Timeout)` | 503 | `STORE_TIMEOUT` |
/// | `Store(Unavailable)` | 503 | `STORE_UNAVAILABLE` |
/// | `Store(_)` | 500 | `STORE_ERROR` |
impl From<CheckinError> for AppError {
    fn from(err: CheckinError) -> Self {
        let (status, code) = match &err {
            CheckinError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            CheckinError::NotFound { .. } => (StatusCode::NOT_FOUND, "TICKET_NOT_FOUND"),
            CheckinError::PermissionDenied(_) => (StatusCode::FORBIDDEN, "PERMISSION_DENIED"),
            CheckinError::AmbiguousTicket { .. } => (StatusCode::CONFLICT, "AMBIGUOUS_TICKET"),
            CheckinError::MissingPrimaryKey { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "MISSING_USER_ID")
            }
            CheckinError::Inconsistent { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INCONSISTENT_STATE")
            }
            CheckinError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_FAILED"),
            CheckinError::Store(StoreError::Timeout(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_TIMEOUT")
            }
            CheckinError::Store(StoreError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            }
            CheckinError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
        };

        let app_error = Self::new(status, err.to_string(), code);
        if status.is_server_error() {
            app_error.with_source(anyhow::Error::new(err))
        } else {
            app_error
        }
    }
}

/// Malformed or non-JSON request bodies become 400s with the usual body shape.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use badge_desk_core::{TicketId, UserId};

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn caller_errors_map_to_4xx() {
        let cases = [
            (CheckinError::InvalidInput("ticketId is required".to_string()), StatusCode::BAD_REQUEST),
            (
                CheckinError::NotFound {
                    ticket_id: TicketId::new("unknown"),
                },
                StatusCode::NOT_FOUND,
            ),
            (CheckinError::PermissionDenied("denied".to_string()), StatusCode::FORBIDDEN),
            (
                CheckinError::AmbiguousTicket {
                    ticket_id: TicketId::new("T-001"),
                    matches: 2,
                },
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn data_errors_map_to_500() {
        let err = AppError::from(CheckinError::Inconsistent {
            user_id: UserId::new("u1"),
            reason: "record no longer exists".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INCONSISTENT_STATE");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn transient_store_errors_map_to_503() {
        let err = AppError::from(CheckinError::Store(StoreError::Timeout(
            "query_by_ticket did not complete within 5000ms".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "STORE_TIMEOUT");
        assert!(err.message().contains("5000ms"));

        let err = AppError::from(CheckinError::Store(StoreError::Backend("syntax error".to_string())));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn permission_message_is_preserved() {
        let err = AppError::from(CheckinError::PermissionDenied(
            "permission denied for table event_users".to_string(),
        ));
        assert!(err.message().contains("permission denied for table event_users"));
    }
}
