//! Business metrics for the check-in desk.
//!
//! Recorded through the `metrics` facade; the server binary installs the
//! Prometheus recorder. Without a recorder every call is a no-op.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `checkin_transitions_total{outcome}` - Check-in attempts by outcome
//!   (`transitioned`, `already_checked_in`)
//! - `checkin_badges_rendered_total{kind}` - Badges rendered (`preview`, `checkin`, `sample`)
//! - `checkin_store_errors_total{operation}` - Failed store calls
//!
//! ## Histograms
//! - `checkin_store_duration_seconds{operation}` - Store call latency, timeouts included

use crate::checkin::CheckinTransition;
use metrics::{describe_counter, describe_histogram};
use std::time::Duration;

/// Badge flavours, used as the `kind` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    /// Read-only preview of an existing record.
    Preview,
    /// Badge returned by a check-in.
    Checkin,
    /// Placeholder badge for printer calibration.
    Sample,
}

impl BadgeKind {
    /// Label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Checkin => "checkin",
            Self::Sample => "sample",
        }
    }
}

/// Register descriptions for every desk metric.
///
/// Call once at startup, after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "checkin_transitions_total",
        "Check-in attempts by outcome (transitioned, already_checked_in)"
    );
    describe_counter!(
        "checkin_badges_rendered_total",
        "Badges rendered by kind (preview, checkin, sample)"
    );
    describe_counter!(
        "checkin_store_errors_total",
        "Store calls that failed, timed out or were denied"
    );
    describe_histogram!(
        "checkin_store_duration_seconds",
        "Latency of registrant store calls"
    );

    tracing::info!("Check-in metrics registered");
}

/// Record the outcome of a check-in attempt.
pub fn record_transition(transition: &CheckinTransition) {
    let outcome = if transition.already_checked_in() {
        "already_checked_in"
    } else {
        "transitioned"
    };
    metrics::counter!("checkin_transitions_total", "outcome" => outcome).increment(1);
}

/// Record a rendered badge.
pub fn record_badge_rendered(kind: BadgeKind) {
    metrics::counter!("checkin_badges_rendered_total", "kind" => kind.as_str()).increment(1);
}

/// Record one store call.
pub fn record_store_call(operation: &'static str, elapsed: Duration, failed: bool) {
    metrics::histogram!("checkin_store_duration_seconds", "operation" => operation)
        .record(elapsed.as_secs_f64());
    if failed {
        metrics::counter!("checkin_store_errors_total", "operation" => operation).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_kind_labels() {
        assert_eq!(BadgeKind::Preview.as_str(), "preview");
        assert_eq!(BadgeKind::Checkin.as_str(), "checkin");
        assert_eq!(BadgeKind::Sample.as_str(), "sample");
    }

    #[test]
    fn recording_without_recorder_is_a_noop() {
        register_metrics();
        record_badge_rendered(BadgeKind::Sample);
        record_store_call("ping", Duration::from_millis(3), true);
    }
}
