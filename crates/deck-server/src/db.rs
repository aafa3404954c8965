//! Sqlite handle and column helpers.
//!
//! A single `rusqlite::Connection` behind a mutex; every query is short and
//! synchronous, so handlers lock, run, and release without holding the lock
//! across awaits. The schema is embedded at compile time and applied on open
//! with `IF NOT EXISTS` statements, so re-opening is idempotent.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use uuid::Uuid;

use crate::error::ServerError;

const SCHEMA: &str = include_str!("../migrations/001_initial.sql");

/// Shared database handle. Cloning is cheap; all clones use one connection.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open (creating if needed) the database at `path` and apply the
    /// schema. `:memory:` is honored for tests.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the file cannot be created or the
    /// schema fails to apply.
    pub fn open(path: &str) -> Result<Self, ServerError> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating database directory {}", parent.display()))?;
                }
            }
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database for tests.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the schema fails to apply.
    pub fn open_in_memory() -> Result<Self, ServerError> {
        Self::open(":memory:")
    }

    /// Run a closure against the connection.
    pub(crate) fn with<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    ) -> Result<T, ServerError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ServerError::Internal(anyhow!("database mutex poisoned")))?;
        f(&conn).map_err(ServerError::from)
    }
}

// ── Column helpers ─────────────────────────────────────────────────────
// Ids and timestamps are stored as TEXT; these keep the row mappers flat.

pub(crate) fn uuid_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn datetime_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw, idx)
}

pub(crate) fn opt_datetime_col(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|value| parse_datetime(&value, idx)).transpose()
}

fn parse_datetime(raw: &str, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// RFC 3339 encoding used for every timestamp column.
pub(crate) fn datetime_param(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub(crate) fn opt_datetime_param(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(datetime_param)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_applies_schema() {
        let db = Db::open_in_memory().unwrap();
        for table in ["users", "sessions", "tasks"] {
            let found: String = db
                .with(|conn| {
                    conn.query_row(
                        "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                        [table],
                        |row| row.get(0),
                    )
                })
                .unwrap();
            assert_eq!(found, table, "table '{table}' should exist");
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let db = Db::open_in_memory().unwrap();
        db.with(|conn| conn.execute_batch(SCHEMA)).unwrap();
    }

    #[test]
    fn datetime_roundtrip_preserves_instant() {
        let now = Utc::now();
        let encoded = datetime_param(now);
        let back = DateTime::parse_from_rfc3339(&encoded)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(back, now);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("taskdeck.db");
        let db = Db::open(path.to_str().unwrap()).unwrap();
        db.with(|conn| conn.execute_batch("SELECT 1")).unwrap();
        assert!(path.exists());
    }
}
