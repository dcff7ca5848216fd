//! Application state for Axum handlers.

use badge_desk_core::{CheckinDesk, RegistrantStore};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cheap to clone: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    desk: CheckinDesk,
    store: Arc<dyn RegistrantStore>,
    table_name: Arc<str>,
    index_name: Arc<str>,
}

impl AppState {
    /// Create state around `desk`, which must be built over `store`.
    ///
    /// `table_name` and `index_name` are reported by `/health`.
    #[must_use]
    pub fn new(
        desk: CheckinDesk,
        store: Arc<dyn RegistrantStore>,
        table_name: &str,
        index_name: &str,
    ) -> Self {
        Self {
            desk,
            store,
            table_name: Arc::from(table_name),
            index_name: Arc::from(index_name),
        }
    }

    /// The check-in desk.
    #[must_use]
    pub const fn desk(&self) -> &CheckinDesk {
        &self.desk
    }

    /// The registrant store, for readiness probes.
    #[must_use]
    pub fn store(&self) -> &dyn RegistrantStore {
        self.store.as_ref()
    }

    /// Registrant table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Ticket index name.
    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index_name
    }
}
