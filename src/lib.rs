// ==========================================
// Stock Ledger - Core Library
// ==========================================
// Vehicle stock overview and arrival schedule ingested from the
// supplier workbook, with a field-level audit trail on manual edits.
// Stack: Rust + SQLite (rusqlite) + calamine
// ==========================================

rust_i18n::i18n!("locales", fallback = "pt-BR");

// Domain entities and types
pub mod domain;

// Data access
pub mod repository;

// Business rules (reconciliation, audit diff)
pub mod engine;

// Workbook parsing and record building
pub mod importer;

// Import settings (config_kv)
pub mod config;

// SQLite connection setup and schema
pub mod db;

pub mod logging;

pub mod i18n;

// Entry points
pub mod api;

// Wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    Actor, AuditEntry, AuditEventType, ImportMode, NewScheduleItem, NewStockItem, ScheduleItem,
    StockItem, StockItemPatch, StockStatus,
};

pub use engine::{AuditDiffEngine, BulkReconciler};

pub use api::{ImportApi, ScheduleApi, StockApi};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Stock Ledger";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
