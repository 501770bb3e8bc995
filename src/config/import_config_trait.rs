// ==========================================
// Stock Ledger - Import Configuration
// ==========================================
// Settings the ingestion pipeline depends on, with built-in defaults
// matching the supplier's workbook, and the reader trait that lets the
// pipeline take them from config_kv or from a fixed value in tests.
// ==========================================

use crate::config::error::ConfigResult;
use crate::importer::coercion::DateOrder;
use crate::importer::column_mapper::SheetLayout;
use serde::{Deserialize, Serialize};

/// Default cap on itemized persistence errors per commit
pub const DEFAULT_MAX_ERROR_MESSAGES: usize = 10;

// ==========================================
// ImportSettings
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Stock overview sheet; marker is the invoice column (layout offset 1)
    pub stock: SheetLayout,
    /// Arrival schedule sheet; marker is the order column (layout offset 0)
    pub schedule: SheetLayout,
    pub max_error_messages: usize,
    pub date_order: DateOrder,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            stock: SheetLayout::new("ESTOQUE GERAL", "NF", 1),
            schedule: SheetLayout::new("PROGRAMA", "PEDIDO", 0),
            max_error_messages: DEFAULT_MAX_ERROR_MESSAGES,
            date_order: DateOrder::DayFirst,
        }
    }
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
// Implementors: ConfigManager (config_kv table), ImportSettings (fixed)
pub trait ImportConfigReader: Send + Sync {
    /// Effective settings for the next import
    fn import_settings(&self) -> ConfigResult<ImportSettings>;
}

impl ImportConfigReader for ImportSettings {
    fn import_settings(&self) -> ConfigResult<ImportSettings> {
        Ok(self.clone())
    }
}
