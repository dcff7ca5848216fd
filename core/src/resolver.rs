//! Ticket resolution through the store's secondary index.

use crate::error::{CheckinError, Result};
use crate::store::{self, RegistrantStore};
use crate::types::{RegistrantRecord, TicketId};
use std::sync::Arc;
use std::time::Duration;

/// Resolves a ticket id to the registrant holding it.
#[derive(Clone)]
pub struct TicketResolver {
    store: Arc<dyn RegistrantStore>,
    timeout: Option<Duration>,
}

impl TicketResolver {
    /// Create a resolver over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn RegistrantStore>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bound every lookup by `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Look up the registrant for `ticket_id`.
    ///
    /// # Errors
    ///
    /// - [`CheckinError::NotFound`] when no record matches
    /// - [`CheckinError::AmbiguousTicket`] when more than one record matches
    /// - [`CheckinError::PermissionDenied`] / [`CheckinError::Store`] on store failure
    pub async fn resolve(&self, ticket_id: &TicketId) -> Result<RegistrantRecord> {
        let mut matches = store::timed(
            "query_by_ticket",
            self.timeout,
            self.store.query_by_ticket(ticket_id.clone()),
        )
        .await?;

        match matches.len() {
            0 => {
                tracing::debug!(ticket_id = %ticket_id, "No registrant for ticket");
                Err(CheckinError::NotFound {
                    ticket_id: ticket_id.clone(),
                })
            }
            1 => Ok(matches.swap_remove(0)),
            count => {
                tracing::error!(
                    ticket_id = %ticket_id,
                    matches = count,
                    "Ticket id is shared by several registrants"
                );
                Err(CheckinError::AmbiguousTicket {
                    ticket_id: ticket_id.clone(),
                    matches: count,
                })
            }
        }
    }
}
