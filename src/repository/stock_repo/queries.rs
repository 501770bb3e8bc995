use super::core::StockItemRepository;
use crate::domain::{Page, StockFilter, StockFilterValues, StockItem, StockStatus};
use crate::repository::error::RepositoryResult;
use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult, Row};

const SELECT_COLUMNS: &str = r#"
    SELECT id, sequence_no, invoice_no, invoice_date, model_code, model, model_year,
           color, chassis, arrival_date, reference_date, status, days_in_stock,
           days_in_yard, customer, physical_location, note, implement, tire,
           deflector, notified, created_at, updated_at
    FROM stock_item
"#;

impl StockItemRepository {
    // ==========================================
    // Queries
    // ==========================================

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<StockItem>> {
        let conn = self.get_conn()?;
        Self::select_by_id(&conn, id)
    }

    pub(super) fn select_by_id(conn: &Connection, id: i64) -> RepositoryResult<Option<StockItem>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let item = conn
            .query_row(&sql, params![id], |row| Self::map_row(row))
            .optional()?;
        Ok(item)
    }

    /// Filtered page in the requested column order (nulls last, id breaks ties)
    pub fn list(&self, filter: &StockFilter) -> RepositoryResult<Page<StockItem>> {
        let conn = self.get_conn()?;

        let mut clauses: Vec<String> = Vec::new();
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            clauses.push(
                "(invoice_no LIKE ? OR chassis LIKE ? OR model LIKE ? OR customer LIKE ? \
                 OR model_code LIKE ? OR physical_location LIKE ?)"
                    .to_string(),
            );
            for _ in 0..6 {
                args.push(Box::new(pattern.clone()));
            }
        }
        if let Some(status) = filter.status {
            clauses.push("status = ?".to_string());
            args.push(Box::new(status.as_str()));
        }
        if let Some(location) = filter
            .physical_location
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            clauses.push("physical_location LIKE ?".to_string());
            args.push(Box::new(format!("%{}%", location)));
        }
        for (column, value) in [("color", &filter.color), ("tire", &filter.tire)] {
            if let Some(value) = value.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                clauses.push(format!("{} LIKE ?", column));
                args.push(Box::new(format!("%{}%", value)));
            }
        }
        if let Some(code) = filter.model_code.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            clauses.push("model_code = ?".to_string());
            args.push(Box::new(code.to_string()));
        }
        if let Some(min) = filter.days_in_stock_min {
            clauses.push("days_in_stock >= ?".to_string());
            args.push(Box::new(min));
        }
        if let Some(max) = filter.days_in_stock_max {
            clauses.push("days_in_stock <= ?".to_string());
            args.push(Box::new(max));
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM stock_item{}", where_sql),
            params_from_iter(args.iter()),
            |row| row.get(0),
        )?;

        let page_size = filter.page_size.max(1) as i64;
        let offset = (filter.page.max(1) as i64 - 1) * page_size;
        args.push(Box::new(page_size));
        args.push(Box::new(offset));

        let column = filter.order_by.column();
        let sql = format!(
            "{}{} ORDER BY {col} IS NULL, {col} {dir}, id LIMIT ? OFFSET ?",
            SELECT_COLUMNS,
            where_sql,
            col = column,
            dir = filter.order_dir.as_sql()
        );
        let mut stmt = conn.prepare(&sql)?;
        let data = stmt
            .query_map(params_from_iter(args.iter()), |row| Self::map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(Page {
            data,
            total: total.max(0) as u64,
        })
    }

    /// Free, older than the critical threshold (by magnitude), not yet notified
    pub fn find_critical(&self) -> RepositoryResult<Vec<StockItem>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE status = ?1 AND (days_in_stock > ?2 OR days_in_stock < -?2) \
             AND notified = 0 \
             ORDER BY ABS(CAST(days_in_stock AS REAL)) DESC, id",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(
                params![StockStatus::Free.as_str(), StockItem::CRITICAL_DAYS],
                |row| Self::map_row(row),
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(items)
    }

    /// Distinct non-empty locations, colors, tires and codes
    pub fn filter_values(&self) -> RepositoryResult<StockFilterValues> {
        let conn = self.get_conn()?;
        Ok(StockFilterValues {
            locations: distinct_values(&conn, "physical_location")?,
            colors: distinct_values(&conn, "color")?,
            tires: distinct_values(&conn, "tire")?,
            model_codes: distinct_values(&conn, "model_code")?,
        })
    }

    pub fn count(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM stock_item", [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }

    // ==========================================
    // Row mapping
    // ==========================================

    fn map_row(row: &Row) -> SqliteResult<StockItem> {
        let status: String = row.get(11)?;
        Ok(StockItem {
            id: row.get(0)?,
            sequence_no: row.get(1)?,
            invoice_no: row.get(2)?,
            invoice_date: row.get(3)?,
            model_code: row.get(4)?,
            model: row.get(5)?,
            model_year: row.get(6)?,
            color: row.get(7)?,
            chassis: row.get(8)?,
            arrival_date: row.get(9)?,
            current_date: row.get(10)?,
            status: StockStatus::from_db(&status),
            days_in_stock: row.get(12)?,
            days_in_yard: row.get(13)?,
            customer: row.get(14)?,
            physical_location: row.get(15)?,
            note: row.get(16)?,
            implement: row.get(17)?,
            tire: row.get(18)?,
            deflector: row.get(19)?,
            notified: row.get(20)?,
            created_at: row.get(21)?,
            updated_at: row.get(22)?,
        })
    }
}

/// `column` must be a fixed stock_item column name
fn distinct_values(conn: &Connection, column: &str) -> RepositoryResult<Vec<String>> {
    let sql = format!(
        "SELECT DISTINCT {col} FROM stock_item \
         WHERE {col} IS NOT NULL AND TRIM({col}) != '' ORDER BY {col}",
        col = column
    );
    let mut stmt = conn.prepare(&sql)?;
    let values = stmt
        .query_map([], |row| row.get(0))?
        .collect::<SqliteResult<Vec<String>>>()?;
    Ok(values)
}
