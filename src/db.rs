// ==========================================
// Stock Ledger - SQLite connection setup
// ==========================================
// Every connection gets the same PRAGMAs (foreign keys, busy timeout).
// The schema is created idempotently on open.
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema version written by `init_schema`
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Per-connection PRAGMAs
///
/// foreign_keys must be enabled on every connection, otherwise deleting a
/// stock item leaves its audit entries behind.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a connection, apply PRAGMAs and make sure the schema exists
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Create all tables and indexes if missing
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS stock_item (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sequence_no INTEGER,
            invoice_no TEXT,
            invoice_date TEXT,
            model_code TEXT,
            model TEXT,
            model_year TEXT,
            color TEXT,
            chassis TEXT,
            arrival_date TEXT,
            reference_date TEXT,
            status TEXT NOT NULL DEFAULT 'LIVRE',
            days_in_stock INTEGER,
            days_in_yard INTEGER,
            customer TEXT,
            physical_location TEXT,
            note TEXT,
            implement TEXT,
            tire TEXT,
            deflector TEXT,
            notified INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS ux_stock_item_sequence_no
            ON stock_item(sequence_no);
        CREATE INDEX IF NOT EXISTS ix_stock_item_status
            ON stock_item(status);

        CREATE TABLE IF NOT EXISTS schedule_item (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_ref TEXT,
            model_id TEXT,
            expected_month TEXT,
            model TEXT,
            color TEXT,
            location TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS audit_entry (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id INTEGER NOT NULL REFERENCES stock_item(id) ON DELETE CASCADE,
            event_type TEXT NOT NULL,
            field TEXT,
            old_value TEXT,
            new_value TEXT,
            actor_name TEXT NOT NULL,
            actor_id INTEGER NOT NULL,
            note TEXT,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS ix_audit_entry_item
            ON audit_entry(item_id, created_at);

        CREATE TABLE IF NOT EXISTS config_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Highest recorded schema version (None when the table is missing)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        let on: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(on, 1);
    }
}
