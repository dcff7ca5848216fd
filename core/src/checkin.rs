//! The check-in state machine.
//!
//! ```text
//! NotCheckedIn ──mark_checked_in(now)──► CheckedIn { at: now }   (terminal)
//! ```
//!
//! The transition is a single conditional write at the store. Losing a race
//! against a concurrent caller is an expected, successful outcome: the loser
//! gets [`CheckinTransition::AlreadyCheckedIn`] carrying the winner's timestamp.

use crate::error::{CheckinError, Result};
use crate::store::{self, ConditionalUpdate, RegistrantStore};
use crate::types::{CheckinState, RegistrantRecord, UserId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a check-in attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckinTransition {
    /// This call performed the write.
    Transitioned {
        /// The timestamp this call supplied, as stored.
        checked_in_at: DateTime<Utc>,
    },
    /// The registrant was already checked in; nothing was written.
    AlreadyCheckedIn {
        /// The timestamp stored by the earlier, winning call.
        checked_in_at: DateTime<Utc>,
    },
}

impl CheckinTransition {
    /// The stored check-in instant.
    #[must_use]
    pub const fn checked_in_at(&self) -> DateTime<Utc> {
        match self {
            Self::Transitioned { checked_in_at } | Self::AlreadyCheckedIn { checked_in_at } => {
                *checked_in_at
            }
        }
    }

    /// `true` when another call had already performed the transition.
    #[must_use]
    pub const fn already_checked_in(&self) -> bool {
        matches!(self, Self::AlreadyCheckedIn { .. })
    }

    /// Final state after the attempt. Always `CheckedIn`.
    #[must_use]
    pub const fn state(&self) -> CheckinState {
        CheckinState::CheckedIn {
            at: self.checked_in_at(),
        }
    }
}

/// Performs the guarded `NotCheckedIn → CheckedIn` transition.
#[derive(Clone)]
pub struct CheckinStateMachine {
    store: Arc<dyn RegistrantStore>,
    timeout: Option<Duration>,
}

impl CheckinStateMachine {
    /// Create a state machine over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn RegistrantStore>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bound every conditional write by `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check `user_id` in at `now`, at most once.
    ///
    /// # Errors
    ///
    /// - [`CheckinError::Inconsistent`] when the precondition failed but the
    ///   record is missing or not checked in
    /// - [`CheckinError::PermissionDenied`] / [`CheckinError::Store`] on store failure
    pub async fn mark_checked_in(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<CheckinTransition> {
        let update = store::timed(
            "conditional_check_in",
            self.timeout,
            self.store.conditional_check_in(user_id.clone(), now),
        )
        .await?;

        let transition = match update {
            ConditionalUpdate::Applied(record) => CheckinTransition::Transitioned {
                checked_in_at: record.checked_in_at.unwrap_or(now),
            },
            ConditionalUpdate::PreconditionFailed { current } => {
                Self::classify_rejection(user_id, current)?
            }
        };

        tracing::info!(
            user_id = %user_id,
            already_checked_in = transition.already_checked_in(),
            checked_in_at = %transition.checked_in_at(),
            "Check-in resolved"
        );
        Ok(transition)
    }

    /// Decide what a failed precondition means.
    ///
    /// Only "already checked in with a timestamp" is benign.
    fn classify_rejection(
        user_id: &UserId,
        current: Option<RegistrantRecord>,
    ) -> Result<CheckinTransition> {
        let Some(record) = current else {
            return Err(CheckinError::Inconsistent {
                user_id: user_id.clone(),
                reason: "record no longer exists".to_string(),
            });
        };

        match record.checkin_state() {
            Some(CheckinState::CheckedIn { at }) => {
                Ok(CheckinTransition::AlreadyCheckedIn { checked_in_at: at })
            }
            Some(CheckinState::NotCheckedIn) => Err(CheckinError::Inconsistent {
                user_id: user_id.clone(),
                reason: "precondition failed but record is not checked in".to_string(),
            }),
            None => Err(CheckinError::Inconsistent {
                user_id: user_id.clone(),
                reason: "record is checked in without a timestamp".to_string(),
            }),
        }
    }
}
