//! The check-in desk: validation, resolution, transition and badge rendering.
//!
//! One [`CheckinDesk`] is built at startup and shared by every request. It owns
//! no mutable state; concurrent check-ins for the same registrant are settled
//! by the store's conditional write.

use crate::checkin::{CheckinStateMachine, CheckinTransition};
use crate::environment::Clock;
use crate::error::{CheckinError, Result};
use crate::metrics::{self, BadgeKind};
use crate::resolver::TicketResolver;
use crate::store::RegistrantStore;
use crate::types::{RegistrantRecord, TicketId, UserId, format_timestamp};
use badge_desk_render::{
    BadgeFields, CONTENT_TYPE, DEFAULT_NAME, DEFAULT_PROFESSION, or_placeholder, render_badge,
};
use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Shown on a preview badge that has never been checked in.
pub const NOT_CHECKED_IN: &str = "N/A";
/// Name printed on sample badges.
pub const SAMPLE_NAME: &str = "DUMMY NAME";
/// Profession printed on sample badges.
pub const SAMPLE_PROFESSION: &str = "DUMMY PROFESSION";

/// A rendered badge PDF.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedBadge {
    bytes: Vec<u8>,
}

impl RenderedBadge {
    /// PDF bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the PDF bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Always `application/pdf`.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }
}

impl std::fmt::Debug for RenderedBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedBadge")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Result of a read-only badge preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeOutcome {
    /// Trimmed ticket id that was looked up.
    pub ticket_id: TicketId,
    /// Registrant id, if the record has one.
    pub user_id: Option<UserId>,
    /// Stored name, untouched.
    pub name: Option<String>,
    /// Stored profession, untouched.
    pub profession: Option<String>,
    /// Stored check-in flag.
    pub checked_in: bool,
    /// Stored check-in instant.
    pub checked_in_at: Option<DateTime<Utc>>,
    /// The badge as it would print today.
    pub badge: RenderedBadge,
}

impl BadgeOutcome {
    /// Name as printed on the badge.
    #[must_use]
    pub fn display_name(&self) -> &str {
        or_placeholder(self.name.as_deref(), DEFAULT_NAME)
    }

    /// Profession as printed on the badge.
    #[must_use]
    pub fn display_profession(&self) -> &str {
        or_placeholder(self.profession.as_deref(), DEFAULT_PROFESSION)
    }

    /// Check-in instant as printed on the badge.
    #[must_use]
    pub fn display_checked_in_at(&self) -> String {
        self.checked_in_at
            .as_ref()
            .map_or_else(|| NOT_CHECKED_IN.to_string(), format_timestamp)
    }
}

/// Result of a check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinOutcome {
    /// Trimmed ticket id that was looked up.
    pub ticket_id: TicketId,
    /// Registrant that was checked in.
    pub user_id: UserId,
    /// Stored name, untouched.
    pub name: Option<String>,
    /// Stored profession, untouched.
    pub profession: Option<String>,
    /// Whether this call performed the transition.
    pub transition: CheckinTransition,
    /// Badge stamped with the stored check-in instant.
    pub badge: RenderedBadge,
}

impl CheckinOutcome {
    /// Name as printed on the badge.
    #[must_use]
    pub fn display_name(&self) -> &str {
        or_placeholder(self.name.as_deref(), DEFAULT_NAME)
    }

    /// Profession as printed on the badge.
    #[must_use]
    pub fn display_profession(&self) -> &str {
        or_placeholder(self.profession.as_deref(), DEFAULT_PROFESSION)
    }

    /// Check-in instant as printed on the badge.
    #[must_use]
    pub fn display_checked_in_at(&self) -> String {
        format_timestamp(&self.transition.checked_in_at())
    }
}

/// Front desk service.
///
/// # Example
///
/// ```ignore
/// let desk = CheckinDesk::new(store, Arc::new(SystemClock))
///     .with_store_timeout(Duration::from_secs(5));
///
/// let preview = desk.preview("T-001").await?;
/// let outcome = desk.check_in("T-001").await?;
/// ```
#[derive(Clone)]
pub struct CheckinDesk {
    resolver: TicketResolver,
    machine: CheckinStateMachine,
    clock: Arc<dyn Clock>,
}

impl CheckinDesk {
    /// Create a desk over `store`, timestamping check-ins with `clock`.
    #[must_use]
    pub fn new(store: Arc<dyn RegistrantStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            resolver: TicketResolver::new(Arc::clone(&store)),
            machine: CheckinStateMachine::new(store),
            clock,
        }
    }

    /// Bound every store call by `timeout`.
    #[must_use]
    pub fn with_store_timeout(self, timeout: Duration) -> Self {
        Self {
            resolver: self.resolver.with_timeout(timeout),
            machine: self.machine.with_timeout(timeout),
            clock: self.clock,
        }
    }

    /// Render the badge for `raw_ticket` without changing any state.
    ///
    /// # Errors
    ///
    /// - [`CheckinError::InvalidInput`] for a blank ticket id (no store access)
    /// - resolver errors ([`CheckinError::NotFound`], [`CheckinError::AmbiguousTicket`],
    ///   store failures)
    /// - [`CheckinError::Render`] if the PDF writer fails
    #[tracing::instrument(skip(self), fields(ticket_id = %raw_ticket.trim()))]
    pub async fn preview(&self, raw_ticket: &str) -> Result<BadgeOutcome> {
        let ticket_id = TicketId::parse(raw_ticket)?;
        let record = self.resolver.resolve(&ticket_id).await?;

        let stamp = record
            .checked_in_at
            .as_ref()
            .map_or_else(|| NOT_CHECKED_IN.to_string(), format_timestamp);
        let badge = render(&ticket_id, &record, &stamp, BadgeKind::Preview)?;

        tracing::debug!(
            user_id = record.user_id.as_ref().map(UserId::as_str),
            checked_in = record.checked_in,
            "Badge preview rendered"
        );

        Ok(BadgeOutcome {
            ticket_id,
            user_id: record.user_id,
            name: record.name,
            profession: record.profession,
            checked_in: record.checked_in,
            checked_in_at: record.checked_in_at,
            badge,
        })
    }

    /// Check the holder of `raw_ticket` in and render their badge.
    ///
    /// Calling this again for the same ticket is safe: the second call reports
    /// [`CheckinTransition::AlreadyCheckedIn`] with the original timestamp.
    ///
    /// # Errors
    ///
    /// - [`CheckinError::InvalidInput`] for a blank ticket id (no store access)
    /// - resolver errors ([`CheckinError::NotFound`], [`CheckinError::AmbiguousTicket`])
    /// - [`CheckinError::MissingPrimaryKey`] when the record has no user id
    /// - state machine errors ([`CheckinError::Inconsistent`], store failures)
    /// - [`CheckinError::Render`] if the PDF writer fails
    #[tracing::instrument(skip(self), fields(ticket_id = %raw_ticket.trim()))]
    pub async fn check_in(&self, raw_ticket: &str) -> Result<CheckinOutcome> {
        let ticket_id = TicketId::parse(raw_ticket)?;
        let record = self.resolver.resolve(&ticket_id).await?;

        let Some(user_id) = record.user_id.clone() else {
            tracing::error!("Registrant record has no user id");
            return Err(CheckinError::MissingPrimaryKey { ticket_id });
        };

        // Stored timestamps keep microseconds; truncate so the reported
        // instant reads back identically.
        let now = self.clock.now().trunc_subsecs(6);
        let transition = self.machine.mark_checked_in(&user_id, now).await?;
        metrics::record_transition(&transition);

        let stamp = format_timestamp(&transition.checked_in_at());
        let badge = render(&ticket_id, &record, &stamp, BadgeKind::Checkin)?;

        Ok(CheckinOutcome {
            ticket_id,
            user_id,
            name: record.name,
            profession: record.profession,
            transition,
            badge,
        })
    }

    /// Render a placeholder badge for `id`, stamped with the current time.
    ///
    /// Touches no store. `id` is printed verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`CheckinError::Render`] if the PDF writer fails.
    pub fn sample_badge(&self, id: &str) -> Result<RenderedBadge> {
        let stamp = format_timestamp(&self.clock.now());
        let bytes = render_badge(&BadgeFields {
            ticket_id: id,
            name: SAMPLE_NAME,
            profession: SAMPLE_PROFESSION,
            checked_in_at: &stamp,
        })?;
        metrics::record_badge_rendered(BadgeKind::Sample);
        Ok(RenderedBadge { bytes })
    }
}

/// Render `record`'s badge with `stamp` as the check-in line.
fn render(
    ticket_id: &TicketId,
    record: &RegistrantRecord,
    stamp: &str,
    kind: BadgeKind,
) -> Result<RenderedBadge> {
    let bytes = render_badge(&BadgeFields {
        ticket_id: ticket_id.as_str(),
        name: record.name.as_deref().unwrap_or_default(),
        profession: record.profession.as_deref().unwrap_or_default(),
        checked_in_at: stamp,
    })?;
    metrics::record_badge_rendered(kind);
    Ok(RenderedBadge { bytes })
}
