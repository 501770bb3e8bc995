// ==========================================
// Stock Ledger - Audit Entry Repository
// ==========================================
// Table: audit_entry (append-only, cascades with its stock item)
// ==========================================

use crate::domain::{AuditEntry, AuditEventType, NewAuditEntry};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::store::AuditStore;
use chrono::Utc;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct AuditEntryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AuditEntryRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> SqliteResult<AuditEntry> {
        let raw_type: String = row.get(2)?;
        let event_type = AuditEventType::from_str(&raw_type).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?;
        Ok(AuditEntry {
            id: row.get(0)?,
            item_id: row.get(1)?,
            event_type,
            field: row.get(3)?,
            old_value: row.get(4)?,
            new_value: row.get(5)?,
            actor_name: row.get(6)?,
            actor_id: row.get(7)?,
            note: row.get(8)?,
            created_at: row.get(9)?,
        })
    }
}

/// Insert one entry on the given connection or transaction
pub(crate) fn insert_entry(conn: &Connection, entry: &NewAuditEntry) -> RepositoryResult<i64> {
    conn.execute(
        r#"
        INSERT INTO audit_entry (
            item_id, event_type, field, old_value, new_value,
            actor_name, actor_id, note, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            entry.item_id,
            entry.event_type.as_str(),
            entry.field,
            entry.old_value,
            entry.new_value,
            entry.actor_name,
            entry.actor_id,
            entry.note,
            Utc::now().naive_utc(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl AuditStore for AuditEntryRepository {
    fn append(&self, entry: &NewAuditEntry) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        insert_entry(&conn, entry)
    }

    fn list_for_item(&self, item_id: i64) -> RepositoryResult<Vec<AuditEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, item_id, event_type, field, old_value, new_value,
                   actor_name, actor_id, note, created_at
            FROM audit_entry
            WHERE item_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )?;
        let entries = stmt
            .query_map(params![item_id], |row| Self::map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(entries)
    }
}
