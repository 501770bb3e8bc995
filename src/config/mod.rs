// ==========================================
// Stock Ledger - Configuration Layer
// ==========================================
// Storage: config_kv table (key-value), defaults in code
// ==========================================

pub mod config_manager;
pub mod error;
pub mod import_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use import_config_trait::{ImportConfigReader, ImportSettings, DEFAULT_MAX_ERROR_MESSAGES};
