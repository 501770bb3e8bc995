// ==========================================
// Stock Ledger - API Layer
// ==========================================
// Business entry points used by the CLI (and any other front end)
// ==========================================

pub mod error;
pub mod import_api;
pub mod schedule_api;
pub mod stock_api;

pub use error::{ApiError, ApiResult};
pub use import_api::{CommitRequest, CommitResult, ImportApi, ImportPreview, PREVIEW_SAMPLE_SIZE};
pub use schedule_api::{MonthGroup, ScheduleApi};
pub use stock_api::{EditAck, StockApi};
