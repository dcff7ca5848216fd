//! `PostgreSQL`-backed [`RegistrantStore`].

use crate::error::{PostgresStoreError, classify};
use badge_desk_core::store::{ConditionalUpdate, RegistrantStore, StoreError, StoreFuture};
use badge_desk_core::types::{RegistrantRecord, TicketId, UserId};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Default registrant table.
pub const DEFAULT_TABLE_NAME: &str = "event_users";
/// Default secondary index on `ticket_id`.
pub const DEFAULT_INDEX_NAME: &str = "ticket_id_index";

/// Columns read for every record.
const COLUMNS: &str = "user_id, ticket_id, name, profession, checked_in, checked_in_at";

/// Longest identifier Postgres keeps without truncation.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Connection and naming settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Registrant table.
    pub table_name: String,
    /// Index on `ticket_id`, created by [`PostgresRegistrantStore::ensure_schema`].
    pub index_name: String,
    /// Pool size.
    pub max_connections: u32,
    /// Time allowed to open or acquire a connection.
    pub connect_timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            max_connections: 10,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(sqlx::FromRow)]
struct RegistrantRow {
    user_id: Option<String>,
    ticket_id: String,
    name: Option<String>,
    profession: Option<String>,
    checked_in: Option<bool>,
    checked_in_at: Option<DateTime<Utc>>,
}

impl From<RegistrantRow> for RegistrantRecord {
    fn from(row: RegistrantRow) -> Self {
        Self {
            user_id: row.user_id.map(UserId::new),
            ticket_id: TicketId::new(row.ticket_id),
            name: row.name,
            profession: row.profession,
            checked_in: row.checked_in.unwrap_or(false),
            checked_in_at: row.checked_in_at,
        }
    }
}

/// Registrant store over a `PostgreSQL` table.
///
/// ```sql
/// CREATE TABLE event_users (
///     user_id       TEXT PRIMARY KEY,
///     ticket_id     TEXT NOT NULL,
///     name          TEXT,
///     profession    TEXT,
///     checked_in    BOOLEAN,
///     checked_in_at TIMESTAMPTZ
/// );
/// CREATE INDEX ticket_id_index ON event_users (ticket_id);
/// ```
///
/// The check-in is a single `UPDATE ... WHERE checked_in IS NOT TRUE`. Under
/// READ COMMITTED a concurrent writer blocks on the row lock and re-evaluates
/// the predicate once the winner commits, so only one update applies.
#[derive(Clone, Debug)]
pub struct PostgresRegistrantStore {
    pool: PgPool,
    table_name: String,
    index_name: String,
}

impl PostgresRegistrantStore {
    /// Wrap an existing pool.
    ///
    /// # Errors
    ///
    /// Returns [`PostgresStoreError::InvalidIdentifier`] if either name is not
    /// a plain SQL identifier.
    pub fn from_pool(
        pool: PgPool,
        table_name: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Result<Self, PostgresStoreError> {
        Ok(Self {
            pool,
            table_name: validate_identifier("table", table_name.into())?,
            index_name: validate_identifier("index", index_name.into())?,
        })
    }

    /// Open a pool to `database_url`.
    ///
    /// # Errors
    ///
    /// - [`PostgresStoreError::InvalidIdentifier`] for bad table or index names
    /// - [`PostgresStoreError::Store`] if the connection fails
    pub async fn connect(
        database_url: &str,
        settings: &StoreSettings,
    ) -> Result<Self, PostgresStoreError> {
        let table_name = validate_identifier("table", settings.table_name.clone())?;
        let index_name = validate_identifier("index", settings.index_name.clone())?;

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.connect_timeout)
            .connect(database_url)
            .await
            .map_err(|e| classify("Failed to connect", &e))?;

        tracing::info!(
            table = %table_name,
            index = %index_name,
            max_connections = settings.max_connections,
            "Connected to registrant database"
        );

        Ok(Self {
            pool,
            table_name,
            index_name,
        })
    }

    /// Create the table and ticket index if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if either statement fails.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                user_id TEXT PRIMARY KEY,
                ticket_id TEXT NOT NULL,
                name TEXT,
                profession TEXT,
                checked_in BOOLEAN,
                checked_in_at TIMESTAMPTZ
            )",
            self.table_name
        );
        sqlx::query(&create_table)
            .execute(&self.pool)
            .await
            .map_err(|e| classify("Failed to create table", &e))?;

        let create_index = format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} (ticket_id)",
            self.index_name, self.table_name
        );
        sqlx::query(&create_index)
            .execute(&self.pool)
            .await
            .map_err(|e| classify("Failed to create index", &e))?;

        tracing::info!(table = %self.table_name, index = %self.index_name, "Schema ensured");
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
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

    async fn fetch_by_user(&self, user_id: &UserId) -> Result<Option<RegistrantRecord>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE user_id = $1", self.table_name);
        let row: Option<RegistrantRow> = sqlx::query_as(&query)
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify("Failed to read registrant", &e))?;
        Ok(row.map(RegistrantRecord::from))
    }
}

impl RegistrantStore for PostgresRegistrantStore {
    fn query_by_ticket(&self, ticket_id: TicketId) -> StoreFuture<'_, Vec<RegistrantRecord>> {
        Box::pin(async move {
            let query = format!("SELECT {COLUMNS} FROM {} WHERE ticket_id = $1", self.table_name);
            let rows: Vec<RegistrantRow> = sqlx::query_as(&query)
                .bind(ticket_id.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| classify("Failed to query by ticket", &e))?;

            tracing::debug!(ticket_id = %ticket_id, matches = rows.len(), "Queried ticket index");
            Ok(rows.into_iter().map(RegistrantRecord::from).collect())
        })
    }

    fn conditional_check_in(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, ConditionalUpdate> {
        Box::pin(async move {
            let query = format!(
                "UPDATE {} SET checked_in = TRUE, checked_in_at = $2
                 WHERE user_id = $1 AND checked_in IS NOT TRUE
                 RETURNING {COLUMNS}",
                self.table_name
            );
            let updated: Option<RegistrantRow> = sqlx::query_as(&query)
                .bind(user_id.as_str())
                .bind(now)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| classify("Failed to check in", &e))?;

            if let Some(row) = updated {
                return Ok(ConditionalUpdate::Applied(row.into()));
            }

            // Separate statement: sees the row as committed by the winner.
            let current = self.fetch_by_user(&user_id).await?;
            tracing::debug!(
                user_id = %user_id,
                exists = current.is_some(),
                "Check-in precondition failed"
            );
            Ok(ConditionalUpdate::PreconditionFailed { current })
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(|e| classify("Ping failed", &e))?;
            Ok(())
        })
    }
}

/// Accept `name` only if it can be spliced into SQL unquoted.
fn validate_identifier(kind: &'static str, name: String) -> Result<String, PostgresStoreError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && name.len() <= MAX_IDENTIFIER_LEN {
        Ok(name)
    } else {
        Err(PostgresStoreError::InvalidIdentifier { kind, name })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifiers_are_accepted() {
        for name in ["event_users", "_staging", "EventUsers2024", "ticket_id_index"] {
            assert_eq!(validate_identifier("table", name.to_string()).unwrap(), name);
        }
    }

    #[test]
    fn unsafe_identifiers_are_rejected() {
        for name in ["", "1users", "event-users", "users; DROP TABLE x", "\"quoted\"", "ñandú"] {
            assert!(validate_identifier("table", name.to_string()).is_err(), "{name}");
        }
    }

    #[test]
    fn overlong_identifiers_are_rejected() {
        assert!(validate_identifier("index", "a".repeat(63)).is_ok());
        assert!(validate_identifier("index", "a".repeat(64)).is_err());
    }

    #[test]
    fn null_flag_reads_as_not_checked_in() {
        let record = RegistrantRecord::from(RegistrantRow {
            user_id: Some("u1".to_string()),
            ticket_id: "T-001".to_string(),
            name: None,
            profession: None,
            checked_in: None,
            checked_in_at: None,
        });
        assert!(!record.checked_in);
        assert_eq!(record.user_id, Some(UserId::new("u1")));
    }

    #[test]
    fn default_settings_use_default_names() {
        let settings = StoreSettings::default();
        assert_eq!(settings.table_name, "event_users");
        assert_eq!(settings.index_name, "ticket_id_index");
    }

    #[tokio::test]
    async fn bad_names_fail_before_connecting() {
        let settings = StoreSettings {
            table_name: "event users".to_string(),
            ..StoreSettings::default()
        };
        let err = PostgresRegistrantStore::connect("postgres://unused/db", &settings)
            .await
            .unwrap_err();
        assert!(matches!(err, PostgresStoreError::InvalidIdentifier { kind: "table", .. }));
    }
}
