// ==========================================
// Stock Ledger - Repository Layer
// ==========================================
// Data access only, no business rules.
// All queries are parameterized.
// ==========================================

pub mod audit_repo;
pub mod error;
pub mod schedule_repo;
pub mod stock_repo;
pub mod store;

pub use audit_repo::AuditEntryRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use schedule_repo::ScheduleItemRepository;
pub use stock_repo::StockItemRepository;
pub use store::{AuditStore, ScheduleStore, StockStore, UpsertOutcome};
