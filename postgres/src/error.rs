//! Mapping from sqlx failures to [`StoreError`].
//!
//! | Failure | `StoreError` |
//! |---|---|
//! | SQLSTATE `42501` insufficient_privilege, `28000`, `28P01` | `PermissionDenied` |
//! | SQLSTATE `57014` query_canceled (statement_timeout), pool acquire timeout | `Timeout` |
//! | SQLSTATE class `08` connection exception, I/O, TLS, closed pool | `Unavailable` |
//! | anything else | `Backend` |

use badge_desk_core::store::StoreError;
use thiserror::Error;

/// Errors raised while constructing a [`PostgresRegistrantStore`](crate::PostgresRegistrantStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostgresStoreError {
    /// A configured table or index name is not a plain SQL identifier.
    #[error("Invalid {kind} name {name:?}: expected [A-Za-z_][A-Za-z0-9_]*, at most 63 bytes")]
    InvalidIdentifier {
        /// `table` or `index`
        kind: &'static str,
        /// The rejected name
        name: String,
    },

    /// The database could not be reached or rejected the request.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Classify a sqlx error raised while performing `context`.
///
/// The database's own message is kept in the result.
pub(crate) fn classify(context: &str, err: &sqlx::Error) -> StoreError {
    let message = format!("{context}: {err}");
    match err {
        sqlx::Error::Database(db_err) => from_sqlstate(db_err.code().as_deref(), message),
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(message),
        _ => StoreError::Backend(message),
    }
}

/// Classify by SQLSTATE.
fn from_sqlstate(code: Option<&str>, message: String) -> StoreError {
    match code {
        Some("42501" | "28000" | "28P01") => StoreError::PermissionDenied(message),
        Some("57014") => StoreError::Timeout(message),
        Some(code) if code.starts_with("08") => StoreError::Unavailable(message),
        _ => StoreError::Backend(message),
    }
}
