//! In-memory registrant store for fast, deterministic tests.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a panicking test

use badge_desk_core::store::{ConditionalUpdate, RegistrantStore, StoreError, StoreFuture};
use badge_desk_core::types::{RegistrantRecord, TicketId, UserId};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// In-memory [`RegistrantStore`].
///
/// Records live in a `Vec` so tests can seed rows the production schema
/// would reject (duplicate tickets, missing user ids). The conditional
/// check-in runs under the write lock, which makes it atomic across tasks.
///
/// Clones share the same records.
///
/// # Example
///
/// ```
/// use badge_desk_testing::{InMemoryRegistrantStore, fixtures};
///
/// let store = InMemoryRegistrantStore::new();
/// store.insert(fixtures::ada());
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryRegistrantStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: RwLock<Vec<RegistrantRecord>>,
    query_failure: RwLock<Option<StoreError>>,
    write_failure: RwLock<Option<StoreError>>,
    latency: RwLock<Option<Duration>>,
    queries: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryRegistrantStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = RegistrantRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Add a record. No uniqueness checks.
    pub fn insert(&self, record: RegistrantRecord) {
        self.inner.records.write().unwrap().push(record);
    }

    /// Current copy of the record keyed by `user_id`.
    #[must_use]
    pub fn get(&self, user_id: &UserId) -> Option<RegistrantRecord> {
        self.inner
            .records
            .read()
            .unwrap()
            .iter()
            .find(|record| record.user_id.as_ref() == Some(user_id))
            .cloned()
    }

    /// Delete every record keyed by `user_id`, returning how many were removed.
    pub fn remove(&self, user_id: &UserId) -> usize {
        let mut records = self.inner.records.write().unwrap();
        let before = records.len();
        records.retain(|record| record.user_id.as_ref() != Some(user_id));
        before - records.len()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.records.read().unwrap().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.records.read().unwrap().is_empty()
    }

    /// Make every subsequent call fail with `error`.
    pub fn fail_with(&self, error: StoreError) {
        self.fail_queries_with(error.clone());
        self.fail_writes_with(error);
    }

    /// Make subsequent ticket lookups fail with `error`.
    pub fn fail_queries_with(&self, error: StoreError) {
        *self.inner.query_failure.write().unwrap() = Some(error);
    }

    /// Make subsequent conditional writes fail with `error`.
    pub fn fail_writes_with(&self, error: StoreError) {
        *self.inner.write_failure.write().unwrap() = Some(error);
    }

    /// Stop injecting failures.
    pub fn clear_failures(&self) {
        *self.inner.query_failure.write().unwrap() = None;
        *self.inner.write_failure.write().unwrap() = None;
    }

    /// Delay every call by `latency` (uses `tokio::time::sleep`, so paused
    /// test clocks apply).
    pub fn set_latency(&self, latency: Duration) {
        *self.inner.latency.write().unwrap() = Some(latency);
    }

    /// Number of `query_by_ticket` calls so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.inner.queries.load(Ordering::SeqCst)
    }

    /// Number of `conditional_check_in` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        let latency = *self.inner.latency.read().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn injected(slot: &RwLock<Option<StoreError>>) -> Result<(), StoreError> {
        slot.read().unwrap().clone().map_or(Ok(()), Err)
    }
}

impl RegistrantStore for InMemoryRegistrantStore {
    fn query_by_ticket(&self, ticket_id: TicketId) -> StoreFuture<'_, Vec<RegistrantRecord>> {
        Box::pin(async move {
            self.inner.queries.fetch_add(1, Ordering::SeqCst);
            self.delay().await;
            Self::injected(&self.inner.query_failure)?;

            Ok(self
                .inner
                .records
                .read()
                .unwrap()
                .iter()
                .filter(|record| record.ticket_id == ticket_id)
                .cloned()
                .collect())
        })
    }

    fn conditional_check_in(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, ConditionalUpdate> {
        Box::pin(async move {
            self.inner.writes.fetch_add(1, Ordering::SeqCst);
            self.delay().await;
            Self::injected(&self.inner.write_failure)?;

            let mut records = self.inner.records.write().unwrap();
            let Some(record) = records
                .iter_mut()
                .find(|record| record.user_id.as_ref() == Some(&user_id))
            else {
                return Ok(ConditionalUpdate::PreconditionFailed { current: None });
            };

            if record.checked_in {
                return Ok(ConditionalUpdate::PreconditionFailed {
                    current: Some(record.clone()),
                });
            }

            record.checked_in = true;
            record.checked_in_at = Some(now);
            Ok(ConditionalUpdate::Applied(record.clone()))
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move { Self::injected(&self.inner.query_failure) })
    }
}
