//! Error taxonomy for ticket resolution and check-in.
//!
//! "Already checked in" is deliberately absent: it is a successful outcome
//! reported through [`CheckinTransition`](crate::CheckinTransition).

use crate::store::StoreError;
use crate::types::{ParseTicketIdError, TicketId, UserId};
use thiserror::Error;

/// Result type alias for desk operations.
pub type Result<T> = std::result::Result<T, CheckinError>;

/// Failures surfaced by the resolver, the state machine and the desk.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckinError {
    // ═══════════════════════════════════════════════════════════
    // Caller Errors
    // ═══════════════════════════════════════════════════════════

    /// Blank ticket identifier. Rejected before any store access.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No registrant matches the ticket.
    #[error("Ticket {ticket_id} not found")]
    NotFound {
        /// Ticket that was looked up
        ticket_id: TicketId,
    },

    // ═══════════════════════════════════════════════════════════
    // Data Integrity Errors
    // ═══════════════════════════════════════════════════════════

    /// The secondary index returned more than one registrant for a ticket.
    #[error("Ticket {ticket_id} matches {matches} registrants")]
    AmbiguousTicket {
        /// Ticket that was looked up
        ticket_id: TicketId,
        /// Number of records returned by the index
        matches: usize,
    },

    /// A resolved record has no primary identifier.
    #[error("Registrant for ticket {ticket_id} has no userId")]
    MissingPrimaryKey {
        /// Ticket whose record is malformed
        ticket_id: TicketId,
    },

    /// The conditional update failed for a reason other than "already checked in".
    #[error("Inconsistent check-in state for user {user_id}: {reason}")]
    Inconsistent {
        /// Registrant whose state was unexpected
        user_id: UserId,
        /// What was observed
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Store Errors
    // ═══════════════════════════════════════════════════════════

    /// The store rejected the operation due to access-control policy.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Any other store failure (network, throttling, timeout, unknown).
    #[error(transparent)]
    Store(StoreError),

    // ═══════════════════════════════════════════════════════════
    // Rendering Errors
    // ═══════════════════════════════════════════════════════════

    /// The PDF writer failed to encode the badge.
    #[error("Badge rendering failed: {0}")]
    Render(String),
}

impl CheckinError {
    /// Whether retrying the same call might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::Timeout(_) | StoreError::Unavailable(_))
        )
    }
}

impl From<StoreError> for CheckinError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PermissionDenied(message) => Self::PermissionDenied(message),
            other => Self::Store(other),
        }
    }
}

impl From<ParseTicketIdError> for CheckinError {
    fn from(err: ParseTicketIdError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<badge_desk_render::BadgeError> for CheckinError {
    fn from(err: badge_desk_render::BadgeError) -> Self {
        Self::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_is_split_out_of_store_errors() {
        let err = CheckinError::from(StoreError::PermissionDenied(
            "User is not authorized to perform: UpdateItem".to_string(),
        ));
        assert_eq!(
            err,
            CheckinError::PermissionDenied("User is not authorized to perform: UpdateItem".to_string())
        );
    }

    #[test]
    fn store_diagnostic_is_preserved() {
        let err = CheckinError::from(StoreError::Backend("connection reset by peer".to_string()));
        assert!(err.to_string().contains("connection reset by peer"));
    }

    #[test]
    fn blank_ticket_maps_to_invalid_input() {
        let err = CheckinError::from(ParseTicketIdError);
        assert_eq!(err, CheckinError::InvalidInput("ticketId is required".to_string()));
    }

    #[test]
    fn only_transient_store_errors_are_retryable() {
        assert!(CheckinError::Store(StoreError::Timeout("5s".to_string())).is_retryable());
        assert!(!CheckinError::PermissionDenied("denied".to_string()).is_retryable());
        assert!(
            !CheckinError::NotFound {
                ticket_id: TicketId::new("T-404")
            }
            .is_retryable()
        );
    }
}
