//! Registrant store trait and related types.
//!
//! The store is the only shared mutable resource in the system. Correctness of
//! the check-in transition rests entirely on [`RegistrantStore::conditional_check_in`]
//! being atomic at the store: the desk holds no locks of its own.
//!
//! # Implementations
//!
//! - `PostgresRegistrantStore` (in `badge-desk-postgres` crate): Production implementation
//! - `InMemoryRegistrantStore` (in `badge-desk-testing` crate): Fast, deterministic testing

use crate::types::{RegistrantRecord, TicketId, UserId};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Boxed future returned by [`RegistrantStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors reported by a store backend.
///
/// Every variant carries the backend's original diagnostic message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Access-control policy rejected the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The call did not complete within the configured timeout.
    #[error("Store timed out: {0}")]
    Timeout(String),

    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("Store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// The backend's diagnostic message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::PermissionDenied(message)
            | Self::Timeout(message)
            | Self::Unavailable(message)
            | Self::Backend(message) => message,
        }
    }
}

/// Result of a conditional check-in write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalUpdate {
    /// The precondition held and the record now reads `checked_in = true`.
    Applied(RegistrantRecord),
    /// The precondition did not hold. Nothing was written.
    PreconditionFailed {
        /// The record as read after the failed write, `None` if it does not exist.
        current: Option<RegistrantRecord>,
    },
}

/// Registrant store abstraction.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one handle is created at startup
/// and shared by every request.
///
/// # Dyn Compatibility
///
/// Methods return [`StoreFuture`] instead of using `async fn` so the store can
/// be injected as `Arc<dyn RegistrantStore>`.
pub trait RegistrantStore: Send + Sync {
    /// Secondary-index lookup by exact ticket id.
    ///
    /// Returns every matching record, in the order the backend yields them.
    /// An empty vector means no match (not an error).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails or denies access.
    fn query_by_ticket(&self, ticket_id: TicketId) -> StoreFuture<'_, Vec<RegistrantRecord>>;

    /// Atomically set `checked_in = true, checked_in_at = now` on the record
    /// keyed by `user_id`, only if `checked_in` is currently absent or false.
    ///
    /// On [`ConditionalUpdate::PreconditionFailed`] the implementation reads
    /// the record again so the caller sees the state that defeated it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails or denies access.
    fn conditional_check_in(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, ConditionalUpdate>;

    /// Cheap connectivity probe for readiness checks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be reached.
    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}

/// Run a store call under an optional timeout and record its latency.
///
/// Expiry surfaces as [`StoreError::Timeout`]; the call is never retried here.
pub(crate) async fn timed<T>(
    operation: &'static str,
    timeout: Option<Duration>,
    call: StoreFuture<'_, T>,
) -> Result<T, StoreError> {
    let started = Instant::now();
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(format!(
                "{operation} did not complete within {}ms",
                limit.as_millis()
            ))),
        },
        None => call.await,
    };

    crate::metrics::record_store_call(operation, started.elapsed(), result.is_err());
    if let Err(error) = &result {
        tracing::warn!(operation, error = %error, "Store call failed");
    }

    result
}
