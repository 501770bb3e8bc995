// ==========================================
// Stock Ledger - Configuration Manager
// ==========================================
// Key-value overrides stored in the config_kv table.
// Missing keys fall back to ImportSettings::default().
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::import_config_trait::{ImportConfigReader, ImportSettings};
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Open a dedicated connection to the database file
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// Raw value of a key
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or overwrite a key
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// All stored keys, sorted
    pub fn list_configs(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            map.insert(key, value);
        }
        Ok(map)
    }

    fn override_text(&self, key: &str, target: &mut String) -> ConfigResult<()> {
        if let Some(value) = self.get_config_value(key)? {
            if !value.trim().is_empty() {
                *target = value;
            }
        }
        Ok(())
    }

    fn override_parsed<T>(&self, key: &str, target: &mut T) -> ConfigResult<()>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        if let Some(value) = self.get_config_value(key)? {
            *target = value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone(),
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }
}

impl ImportConfigReader for ConfigManager {
    fn import_settings(&self) -> ConfigResult<ImportSettings> {
        let mut settings = ImportSettings::default();

        self.override_text(config_keys::STOCK_SHEET_PATTERN, &mut settings.stock.sheet_pattern)?;
        self.override_text(config_keys::STOCK_MARKER, &mut settings.stock.marker)?;
        self.override_parsed(config_keys::STOCK_MARKER_COLUMN, &mut settings.stock.marker_column)?;

        self.override_text(config_keys::SCHEDULE_SHEET_PATTERN, &mut settings.schedule.sheet_pattern)?;
        self.override_text(config_keys::SCHEDULE_MARKER, &mut settings.schedule.marker)?;
        self.override_parsed(config_keys::SCHEDULE_MARKER_COLUMN, &mut settings.schedule.marker_column)?;

        self.override_parsed(config_keys::MAX_ERROR_MESSAGES, &mut settings.max_error_messages)?;
        self.override_parsed(config_keys::DATE_ORDER, &mut settings.date_order)?;

        Ok(settings)
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    // Stock overview sheet
    pub const STOCK_SHEET_PATTERN: &str = "import.stock_sheet_pattern";
    pub const STOCK_MARKER: &str = "import.stock_marker";
    pub const STOCK_MARKER_COLUMN: &str = "import.stock_marker_column";

    // Arrival schedule sheet
    pub const SCHEDULE_SHEET_PATTERN: &str = "import.schedule_sheet_pattern";
    pub const SCHEDULE_MARKER: &str = "import.schedule_marker";
    pub const SCHEDULE_MARKER_COLUMN: &str = "import.schedule_marker_column";

    // Commit / coercion
    pub const MAX_ERROR_MESSAGES: &str = "import.max_error_messages";
    pub const DATE_ORDER: &str = "import.date_order"; // DAY_FIRST | MONTH_FIRST
}
