//! # Badge Desk Testing
//!
//! Testing utilities for Badge Desk.
//!
//! This crate provides:
//! - [`InMemoryRegistrantStore`]: atomic in-memory store with failure and latency injection
//! - [`FixedClock`]: deterministic time
//! - [`fixtures`]: the canonical registrants used across test suites
//! - [`properties`]: proptest strategies for ticket input
//!
//! ## Example
//!
//! ```ignore
//! use badge_desk_core::CheckinDesk;
//! use badge_desk_testing::{FixedClock, InMemoryRegistrantStore, fixtures};
//!
//! #[tokio::test]
//! async fn checks_ada_in() {
//!     let store = InMemoryRegistrantStore::with_records([fixtures::ada()]);
//!     let desk = CheckinDesk::new(
//!         Arc::new(store),
//!         Arc::new(FixedClock::new(fixtures::scenario_time())),
//!     );
//!
//!     let outcome = desk.check_in("T-001").await.unwrap();
//!     assert!(!outcome.transition.already_checked_in());
//! }
//! ```

use badge_desk_core::environment::Clock;
use chrono::{DateTime, Utc};

mod registrant_store;

pub use registrant_store::InMemoryRegistrantStore;

/// Mock implementations of Environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use badge_desk_testing::mocks::FixedClock;
    /// use badge_desk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Fixed clock at the scenario instant, 2024-01-01T10:00:00Z.
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(crate::fixtures::scenario_time())
    }
}

/// Canonical test registrants.
pub mod fixtures {
    use badge_desk_core::types::{RegistrantRecord, TicketId, UserId};
    use chrono::{DateTime, TimeZone, Utc};

    /// 2024-01-01T10:00:00Z.
    #[must_use]
    pub fn scenario_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0)
            .single()
            .unwrap_or_default()
    }

    /// Ada Lovelace, engineer, holder of ticket `T-001`, user `u1`, not checked in.
    #[must_use]
    pub fn ada() -> RegistrantRecord {
        registrant("u1", "T-001")
            .with_name("Ada Lovelace")
            .with_profession("Engineer")
    }

    /// A registrant with no name or profession.
    #[must_use]
    pub fn registrant(user_id: &str, ticket_id: &str) -> RegistrantRecord {
        RegistrantRecord::new(UserId::new(user_id), TicketId::new(ticket_id))
    }

    /// A row with a ticket but no primary key.
    #[must_use]
    pub fn without_user_id(ticket_id: &str) -> RegistrantRecord {
        let mut record = registrant("", ticket_id);
        record.user_id = None;
        record
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Ticket ids as issued: printable, no surrounding whitespace.
    pub fn ticket_id() -> impl Strategy<Value = String> {
        "[A-Z]{1,3}-[0-9]{1,6}"
    }

    /// Inputs that trim to nothing.
    pub fn blank_input() -> impl Strategy<Value = String> {
        "[ \t\r\n]{0,8}"
    }

    /// `ticket_id` wrapped in arbitrary surrounding whitespace.
    pub fn padded(ticket_id: String) -> impl Strategy<Value = (String, String)> {
        (blank_input(), blank_input())
            .prop_map(move |(lead, trail)| (format!("{lead}{ticket_id}{trail}"), ticket_id.clone()))
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2024-01-01T10:00:00+00:00");
    }

    #[test]
    fn fixture_has_no_user_id() {
        assert!(fixtures::without_user_id("T-009").user_id.is_none());
    }
}
