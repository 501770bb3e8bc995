// ==========================================
// Stock Ledger - Importer Error Types
// ==========================================
// Only whole-workbook failures are errors.
// Missing sheets/headers are warnings, bad rows are dropped.
// ==========================================

use thiserror::Error;

/// Importer error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (expected .xlsx/.xlsm/.xls/.ods)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    // ===== Workbook errors =====
    #[error("workbook decode failed: {0}")]
    WorkbookDecodeError(String),

    #[error("worksheet '{sheet}' could not be read: {message}")]
    WorksheetReadError { sheet: String, message: String },
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::WorkbookDecodeError(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
