// ==========================================
// Stock Ledger - Engine Error Types
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("stock item not found: id={0}")]
    ItemNotFound(i64),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type EngineResult<T> = Result<T, EngineError>;
