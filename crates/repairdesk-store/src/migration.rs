//! Schema migrations for the SQLite slot database.
//!
//! Applied versions are recorded as rows of `schema_migrations`. Entry `i`
//! of [`MIGRATIONS`] moves the schema from version `i` to `i + 1`; pending
//! entries run in one transaction when the database is opened.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Ordered schema steps.
const MIGRATIONS: &[&str] = &[
    // v1: one row per slot, the payload is the whole serialized collection.
    "CREATE TABLE slots (
        key        TEXT PRIMARY KEY,
        payload    TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    );",
];

/// Schema version this build writes.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Highest version recorded in `schema_migrations`, creating the table if
/// needed. A fresh database is version 0.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        );",
    )?;
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?)
}

/// Bring the schema up to [`CURRENT_VERSION`]. Running it again is a no-op.
///
/// A database written by a newer build is refused rather than touched.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let found = schema_version(conn)?;
    if found > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "slot database has schema version {found}, this build knows up to {CURRENT_VERSION}"
        )));
    }
    if found == CURRENT_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (step, sql) in MIGRATIONS.iter().enumerate().skip(found as usize) {
        let version = step as u32 + 1;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, Utc::now().timestamp_millis()],
        )?;
        debug!(version, "applied slot schema migration");
    }
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn
    }

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get::<_, u32>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_fresh_database_gets_both_tables() {
        let conn = fresh();
        assert!(table_exists(&conn, "slots"));
        assert!(table_exists(&conn, "schema_migrations"));
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_migrate_twice_is_a_no_op() {
        let mut conn = fresh();
        conn.execute(
            "INSERT INTO slots (key, payload, updated_at) VALUES ('service_orders', '[]', 0)",
            [],
        )
        .unwrap();

        migrate(&mut conn).unwrap();

        let rows: u32 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, CURRENT_VERSION);
        let payload: String = conn
            .query_row("SELECT payload FROM slots WHERE key = 'service_orders'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(payload, "[]");
    }

    #[test]
    fn test_newer_schema_is_refused() {
        let mut conn = fresh();
        conn.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, 0)",
            params![CURRENT_VERSION + 1],
        )
        .unwrap();

        assert!(matches!(migrate(&mut conn), Err(StoreError::Migration(_))));
    }
}
