// ==========================================
// Stock Ledger - Configuration Error Types
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("config lock failed: {0}")]
    LockError(String),

    #[error("invalid config value (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
