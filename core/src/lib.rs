//! # Badge Desk Core
//!
//! Ticket resolution, the check-in state machine and the desk service that
//! composes them with the badge renderer.
//!
//! ## Core Concepts
//!
//! - **Registrant record**: one attendee, keyed by `user_id`, looked up by `ticket_id`
//! - **Ticket resolver**: secondary-index lookup from ticket to record
//! - **Check-in state machine**: at-most-once `NotCheckedIn → CheckedIn` transition
//!   delegated to the store's conditional update
//! - **Desk**: validates input, runs the operations above and renders the badge
//! - **Environment**: injected dependencies (store, clock)
//!
//! ## Request Flow
//!
//! ```text
//! ticket id ──► validate ──► TicketResolver ──► CheckinStateMachine ──► render_badge
//!                                   │              (check-in only)            ▲
//!                                   └─────────────── preview ─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use badge_desk_core::{CheckinDesk, SystemClock};
//! use std::sync::Arc;
//!
//! let desk = CheckinDesk::new(store, Arc::new(SystemClock));
//! let outcome = desk.check_in("T-001").await?;
//! assert!(!outcome.transition.already_checked_in());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checkin;
pub mod desk;
pub mod error;
pub mod metrics;
pub mod resolver;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use checkin::{CheckinStateMachine, CheckinTransition};
pub use desk::{BadgeOutcome, CheckinDesk, CheckinOutcome, RenderedBadge};
pub use environment::{Clock, SystemClock};
pub use error::{CheckinError, Result};
pub use resolver::TicketResolver;
pub use store::{ConditionalUpdate, RegistrantStore, StoreError, StoreFuture};
pub use types::{CheckinState, ParseTicketIdError, RegistrantRecord, TicketId, UserId};

/// Environment module - Dependency injection traits
///
/// All time-dependent behavior goes through [`Clock`](environment::Clock) so
/// the check-in timestamp can be pinned in tests.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
