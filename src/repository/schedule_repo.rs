// ==========================================
// Stock Ledger - Arrival Schedule Repository
// ==========================================
// Table: schedule_item. The set is always replaced as a whole.
// ==========================================

use crate::domain::{NewScheduleItem, ScheduleFilterValues, ScheduleItem};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::store::ScheduleStore;
use chrono::Utc;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct ScheduleItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleItemRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> SqliteResult<ScheduleItem> {
        Ok(ScheduleItem {
            id: row.get(0)?,
            order_ref: row.get(1)?,
            model_id: row.get(2)?,
            expected_month: row.get(3)?,
            model: row.get(4)?,
            color: row.get(5)?,
            location: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl ScheduleStore for ScheduleItemRepository {
    /// Delete-all then insert-all in one transaction; any failure rolls back
    fn replace_all(&self, items: &[NewScheduleItem]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let ts = Utc::now().naive_utc();

        tx.execute("DELETE FROM schedule_item", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO schedule_item (
                    order_ref, model_id, expected_month, model, color, location,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                "#,
            )?;
            for item in items {
                stmt.execute(params![
                    item.order_ref,
                    item.model_id,
                    item.expected_month,
                    item.model,
                    item.color,
                    item.location,
                    ts,
                ])?;
            }
        }

        tx.commit()?;
        Ok(items.len())
    }

    /// Insertion order; display ordering is applied by the caller
    fn list(&self) -> RepositoryResult<Vec<ScheduleItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, order_ref, model_id, expected_month, model, color, location,
                   created_at, updated_at
            FROM schedule_item
            ORDER BY id
            "#,
        )?;
        let items = stmt
            .query_map([], |row| Self::map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(items)
    }

    fn filter_values(&self) -> RepositoryResult<ScheduleFilterValues> {
        let conn = self.get_conn()?;
        Ok(ScheduleFilterValues {
            months: Self::distinct_values(&conn, "expected_month")?,
            locations: Self::distinct_values(&conn, "location")?,
        })
    }
}

impl ScheduleItemRepository {
    /// `column` must be a fixed schedule_item column name
    fn distinct_values(conn: &Connection, column: &str) -> RepositoryResult<Vec<String>> {
        let sql = format!(
            "SELECT DISTINCT {col} FROM schedule_item \
             WHERE {col} IS NOT NULL AND TRIM({col}) != '' ORDER BY {col}",
            col = column
        );
        let mut stmt = conn.prepare(&sql)?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<SqliteResult<Vec<String>>>()?;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_db() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        Arc::new(Mutex::new(conn))
    }

    fn line(order_ref: &str, month: &str) -> NewScheduleItem {
        NewScheduleItem {
            order_ref: Some(order_ref.to_string()),
            expected_month: Some(month.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_replace_all_discards_previous_set() {
        let repo = ScheduleItemRepository::new(setup_test_db());
        repo.replace_all(&[line("P-1", "MARÇO"), line("P-2", "ABRIL")]).unwrap();
        assert_eq!(repo.replace_all(&[line("P-3", "MAIO")]).unwrap(), 1);

        let stored = repo.list().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].order_ref.as_deref(), Some("P-3"));
    }

    #[test]
    fn test_filter_values_are_distinct_and_non_empty() {
        let repo = ScheduleItemRepository::new(setup_test_db());
        let mut blank = line("P-3", " ");
        blank.location = Some("MATRIZ".to_string());
        let mut with_location = line("P-2", "ABRIL");
        with_location.location = Some("FILIAL".to_string());
        repo.replace_all(&[line("P-1", "MAIO"), with_location, blank, line("P-4", "MAIO")])
            .unwrap();

        let values = repo.filter_values().unwrap();
        assert_eq!(values.months, vec!["ABRIL", "MAIO"]);
        assert_eq!(values.locations, vec!["FILIAL", "MATRIZ"]);
    }

    #[test]
    fn test_replace_all_with_empty_set_clears() {
        let repo = ScheduleItemRepository::new(setup_test_db());
        repo.replace_all(&[line("P-1", "MARÇO")]).unwrap();
        repo.replace_all(&[]).unwrap();
        assert!(repo.list().unwrap().is_empty());
    }
}
