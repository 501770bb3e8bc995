use crate::domain::{NewAuditEntry, NewStockItem, StockItem, StockItemPatch};
use crate::repository::audit_repo::insert_entry;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::store::UpsertOutcome;
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// StockItemRepository
// ==========================================
pub struct StockItemRepository {
    conn: Arc<Mutex<Connection>>,
}

pub(super) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl StockItemRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub(super) fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // Writes
    // ==========================================

    /// Insert, or touch updated_at of the row sharing sequence_no.
    ///
    /// Items without a sequence_no are always inserted.
    pub fn insert_or_touch(&self, item: &NewStockItem) -> RepositoryResult<UpsertOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let ts = now();

        let existing: Option<i64> = match item.sequence_no {
            Some(seq) => tx
                .query_row(
                    "SELECT id FROM stock_item WHERE sequence_no = ?1",
                    params![seq],
                    |row| row.get(0),
                )
                .optional()?,
            None => None,
        };

        let outcome = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE stock_item SET updated_at = ?1 WHERE id = ?2",
                    params![ts, id],
                )?;
                UpsertOutcome::Touched(id)
            }
            None => UpsertOutcome::Inserted(insert_row(&tx, item, ts)?),
        };

        tx.commit()?;
        Ok(outcome)
    }

    /// Plain insert; a duplicate sequence_no is a unique violation
    pub fn insert(&self, item: &NewStockItem) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        insert_row(&conn, item, now())
    }

    /// Insert an item and its trail entry in one transaction.
    ///
    /// `entry.item_id` is replaced by the id of the new row.
    pub fn insert_audited(&self, item: &NewStockItem, entry: &NewAuditEntry) -> RepositoryResult<i64> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let id = insert_row(&tx, item, now())?;
        insert_entry(
            &tx,
            &NewAuditEntry {
                item_id: id,
                ..entry.clone()
            },
        )?;

        tx.commit()?;
        Ok(id)
    }

    pub fn update(&self, id: i64, patch: &StockItemPatch) -> RepositoryResult<StockItem> {
        self.update_audited(id, patch, &[])
    }

    /// Append the entries, then write every column back, in one transaction.
    ///
    /// A failing statement rolls back both the entries and the row.
    pub fn update_audited(
        &self,
        id: i64,
        patch: &StockItemPatch,
        entries: &[NewAuditEntry],
    ) -> RepositoryResult<StockItem> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut item = Self::select_by_id(&tx, id)?
            .ok_or_else(|| RepositoryError::not_found("stock_item", id))?;
        for entry in entries {
            insert_entry(&tx, entry)?;
        }
        item.apply_patch(patch);
        item.updated_at = now();

        tx.execute(
            r#"
            UPDATE stock_item SET
                sequence_no = ?1, invoice_no = ?2, invoice_date = ?3, model_code = ?4,
                model = ?5, model_year = ?6, color = ?7, chassis = ?8,
                arrival_date = ?9, reference_date = ?10, status = ?11,
                days_in_stock = ?12, days_in_yard = ?13, customer = ?14,
                physical_location = ?15, note = ?16, implement = ?17, tire = ?18,
                deflector = ?19, updated_at = ?20
            WHERE id = ?21
            "#,
            params![
                item.sequence_no,
                item.invoice_no,
                item.invoice_date,
                item.model_code,
                item.model,
                item.model_year,
                item.color,
                item.chassis,
                item.arrival_date,
                item.current_date,
                item.status.as_str(),
                item.days_in_stock,
                item.days_in_yard,
                item.customer,
                item.physical_location,
                item.note,
                item.implement,
                item.tire,
                item.deflector,
                item.updated_at,
                id,
            ],
        )?;

        tx.commit()?;
        Ok(item)
    }

    /// Delete an item (its audit entries cascade); false when absent
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM stock_item WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    /// Set the notified flag; returns the number of rows changed
    pub fn mark_notified(&self, ids: &[i64]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let ts = now();

        let mut count = 0;
        for id in ids {
            count += tx.execute(
                "UPDATE stock_item SET notified = 1, updated_at = ?1 WHERE id = ?2 AND notified = 0",
                params![ts, id],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

fn insert_row(conn: &Connection, item: &NewStockItem, ts: NaiveDateTime) -> RepositoryResult<i64> {
    conn.execute(
        r#"
        INSERT INTO stock_item (
            sequence_no, invoice_no, invoice_date, model_code, model, model_year,
            color, chassis, arrival_date, reference_date, status, days_in_stock,
            days_in_yard, customer, physical_location, note, implement, tire,
            deflector, notified, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                  ?16, ?17, ?18, ?19, 0, ?20, ?20)
        "#,
        params![
            item.sequence_no,
            item.invoice_no,
            item.invoice_date,
            item.model_code,
            item.model,
            item.model_year,
            item.color,
            item.chassis,
            item.arrival_date,
            item.current_date,
            item.status.as_str(),
            item.days_in_stock,
            item.days_in_yard,
            item.customer,
            item.physical_location,
            item.note,
            item.implement,
            item.tire,
            item.deflector,
            ts,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
