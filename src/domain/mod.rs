// ==========================================
// Stock Ledger - Domain Layer
// ==========================================
// Entities and enumerations only.
// No storage access, no pipeline logic.
// ==========================================

pub mod audit;
pub mod schedule;
pub mod stock;
pub mod types;

pub use audit::{Actor, AuditEntry, NewAuditEntry};
pub use schedule::{month_index, NewScheduleItem, ScheduleFilterValues, ScheduleItem, MONTHS};
pub use stock::{
    NewStockItem, Page, SortDirection, StockFilter, StockFilterValues, StockItem, StockItemPatch,
    StockSortKey,
};
pub use types::{AuditEventType, ImportMode, StockStatus};
