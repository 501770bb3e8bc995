// ==========================================
// Stock Ledger - Engine Layer
// ==========================================
// Business rules over the storage ports; no SQL here.
// ==========================================

pub mod audit_diff;
pub mod error;
pub mod reconciler;

pub use audit_diff::{tracked_field_names, AuditDiffEngine};
pub use error::{EngineError, EngineResult};
pub use reconciler::{BulkReconciler, ScheduleImportSummary, StockImportSummary};
