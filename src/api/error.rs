// ==========================================
// Stock Ledger - API Error Types
// ==========================================
// Aggregates lower layer errors into caller-facing messages
// ==========================================

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::importer::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("import failed: {0}")]
    ImportError(#[from] ImportError),

    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::ForeignKeyViolation(msg) => ApiError::InvalidInput(msg),
            RepositoryError::LockError(msg) => ApiError::InternalError(msg),
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ItemNotFound(id) => ApiError::NotFound(format!("stock_item(id={})", id)),
            EngineError::Repository(e) => e.into(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
