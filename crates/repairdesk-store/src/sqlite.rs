//! SQLite implementation of the SlotBackend trait.
//!
//! Slots are rows of a single `slots` table in a rusqlite database with
//! bundled SQLite. A write is one upsert statement.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::SlotBackend;

/// Slot backend over one SQLite database file.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open (or create) the database at `path` and bring its schema up to date.
    /// The parent directory must exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// A private in-memory database, gone when dropped.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with the connection locked.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Lock(format!("sqlite connection mutex poisoned: {}", e)))?;
        f(&conn)
    }
}

impl SlotBackend for SqliteBackend {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let payload: Option<String> = conn
                .query_row(
                    "SELECT payload FROM slots WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            debug!(key, found = payload.is_some(), "read slot");
            Ok(payload)
        })
    }

    fn write_slot(&self, key: &str, payload: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO slots (key, payload, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                    payload = excluded.payload,
                    updated_at = excluded.updated_at",
                params![key, payload, Utc::now().timestamp_millis()],
            )?;
            debug!(key, bytes = payload.len(), "wrote slot");
            Ok(())
        })
    }

    fn remove_slot(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM slots WHERE key = ?1", params![key])?;
            Ok(())
        })
    }
}
