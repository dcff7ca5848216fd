//! `PostgreSQL` registrant store for Badge Desk.
//!
//! Implements [`RegistrantStore`](badge_desk_core::RegistrantStore) over a
//! single table keyed by `user_id`, with a secondary index on `ticket_id`.
//!
//! - Ticket lookup is an indexed `SELECT`
//! - Check-in is one conditional `UPDATE ... RETURNING`
//! - Table and index names are configurable and validated as SQL identifiers
//! - sqlx errors are classified into `StoreError` by SQLSTATE
//!
//! # Example
//!
//! ```ignore
//! use badge_desk_postgres::{PostgresRegistrantStore, StoreSettings};
//!
//! let store = PostgresRegistrantStore::connect(
//!     "postgres://localhost/badges",
//!     &StoreSettings::default(),
//! )
//! .await?;
//! store.ensure_schema().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod store;

pub use error::PostgresStoreError;
pub use store::{DEFAULT_INDEX_NAME, DEFAULT_TABLE_NAME, PostgresRegistrantStore, StoreSettings};
