// ==========================================
// Stock Ledger - Application State
// ==========================================
// Opens the shared connection and wires repositories into the APIs
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ImportApi, ScheduleApi, StockApi};
use crate::config::ConfigManager;
use crate::db::open_sqlite_connection;
use crate::repository::{AuditEntryRepository, ScheduleItemRepository, StockItemRepository};

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "STOCK_LEDGER_DB";

/// Shared APIs over one SQLite connection
pub struct AppState {
    pub db_path: String,
    pub config_manager: Arc<ConfigManager>,
    pub import_api: Arc<ImportApi>,
    pub stock_api: Arc<StockApi>,
    pub schedule_api: Arc<ScheduleApi>,
}

impl AppState {
    /// Open (and initialize if needed) the database and build every API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "initializing AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("cannot open database {}: {}", db_path, e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ===== Repositories =====
        let stock_repo = Arc::new(StockItemRepository::new(conn.clone()));
        let schedule_repo = Arc::new(ScheduleItemRepository::new(conn.clone()));
        let audit_repo = Arc::new(AuditEntryRepository::new(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn));

        // ===== APIs =====
        let import_api = Arc::new(ImportApi::new(
            config_manager.clone(),
            stock_repo.clone(),
            schedule_repo.clone(),
        ));
        let stock_api = Arc::new(StockApi::new(stock_repo, audit_repo));
        let schedule_api = Arc::new(ScheduleApi::new(schedule_repo));

        Ok(Self {
            db_path,
            config_manager,
            import_api,
            stock_api,
            schedule_api,
        })
    }
}

/// `STOCK_LEDGER_DB`, else `<data dir>/stock-ledger/stock_ledger.db`,
/// else `./stock_ledger.db`
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    match dirs::data_local_dir() {
        Some(data_dir) => {
            let dir = data_dir.join("stock-ledger");
            // Best effort: opening the database reports the real error
            std::fs::create_dir_all(&dir).ok();
            dir.join("stock_ledger.db").to_string_lossy().into_owned()
        }
        None => "./stock_ledger.db".to_string(),
    }
}
