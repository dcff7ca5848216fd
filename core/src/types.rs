//! Registrant identifiers, the stored record and its check-in state.
//!
//! Records are created by the registration process; this crate only reads
//! them and performs the single check-in transition.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for `TicketId` parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ticketId is required")]
pub struct ParseTicketIdError;

/// Externally issued identifier of one attendance credential.
///
/// # Validation
///
/// - `FromStr::from_str()` / [`TicketId::parse`]: trims the input and rejects
///   empty or whitespace-only strings
/// - `new()`: no validation (for values read back from the store)
///
/// # Examples
///
/// ```
/// use badge_desk_core::TicketId;
///
/// let parsed: TicketId = "  T-001 ".parse().unwrap();
/// assert_eq!(parsed.as_str(), "T-001");
/// assert!("   ".parse::<TicketId>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(String);

impl TicketId {
    /// Create a `TicketId` from trusted input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse caller-supplied input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTicketIdError`] when nothing is left after trimming.
    pub fn parse(raw: &str) -> Result<Self, ParseTicketIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ParseTicketIdError);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the ticket ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TicketId {
    type Err = ParseTicketIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Primary identifier of a registrant, assigned at registration time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new `UserId`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the user ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Projection of one registrant as read from the store.
///
/// Only the fields the desk needs are carried. `checked_in` defaults to
/// `false` when the stored attribute is absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrantRecord {
    /// Primary key. `None` only for malformed rows.
    pub user_id: Option<UserId>,
    /// Secondary-index key.
    pub ticket_id: TicketId,
    /// Display name.
    pub name: Option<String>,
    /// Display profession.
    pub profession: Option<String>,
    /// Monotonic check-in flag.
    #[serde(default)]
    pub checked_in: bool,
    /// Set exactly once, together with `checked_in`.
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl RegistrantRecord {
    /// Create a record that has not checked in yet.
    #[must_use]
    pub fn new(user_id: UserId, ticket_id: TicketId) -> Self {
        Self {
            user_id: Some(user_id),
            ticket_id,
            name: None,
            profession: None,
            checked_in: false,
            checked_in_at: None,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the display profession.
    #[must_use]
    pub fn with_profession(mut self, profession: impl Into<String>) -> Self {
        self.profession = Some(profession.into());
        self
    }

    /// Mark the record as already checked in at `at`.
    #[must_use]
    pub const fn checked_in_at(mut self, at: DateTime<Utc>) -> Self {
        self.checked_in = true;
        self.checked_in_at = Some(at);
        self
    }

    /// Derive the check-in state.
    ///
    /// Returns `None` when the flag is set but no timestamp was stored, which
    /// no writer in this system produces.
    #[must_use]
    pub const fn checkin_state(&self) -> Option<CheckinState> {
        match (self.checked_in, self.checked_in_at) {
            (false, _) => Some(CheckinState::NotCheckedIn),
            (true, Some(at)) => Some(CheckinState::CheckedIn { at }),
            (true, None) => None,
        }
    }
}

/// Check-in state of a registrant. `CheckedIn` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckinState {
    /// Flag absent or false.
    NotCheckedIn,
    /// Flag true, timestamp set.
    CheckedIn {
        /// Instant chosen by the winning transition.
        at: DateTime<Utc>,
    },
}

impl CheckinState {
    /// Whether the registrant has checked in.
    #[must_use]
    pub const fn is_checked_in(&self) -> bool {
        matches!(self, Self::CheckedIn { .. })
    }
}

/// Format a check-in instant the way it is shown on badges and in responses.
///
/// RFC 3339 in UTC with a `Z` suffix; fractional seconds only when non-zero.
///
/// ```
/// use badge_desk_core::types::format_timestamp;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
/// assert_eq!(format_timestamp(&at), "2024-01-01T10:00:00Z");
/// ```
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
