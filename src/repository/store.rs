// ==========================================
// Stock Ledger - Storage Ports
// ==========================================
// Data access interfaces the engines depend on.
// Implementors: StockItemRepository, ScheduleItemRepository,
// AuditEntryRepository (rusqlite); in-memory fakes in tests.
// No business rules here, only CRUD.
// ==========================================

use crate::domain::{
    AuditEntry, NewAuditEntry, NewScheduleItem, NewStockItem, Page, ScheduleFilterValues,
    ScheduleItem, StockFilter, StockFilterValues, StockItem, StockItemPatch,
};
use crate::repository::error::RepositoryResult;
use serde::Serialize;

/// Result of an upsert keyed on sequence_no
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted(i64),
    /// Existing row kept, only updated_at touched
    Touched(i64),
}

impl UpsertOutcome {
    pub fn id(&self) -> i64 {
        match self {
            UpsertOutcome::Inserted(id) | UpsertOutcome::Touched(id) => *id,
        }
    }
}

// ==========================================
// StockStore
// ==========================================
pub trait StockStore: Send + Sync {
    /// Insert a new item, or refresh updated_at of the item with the same
    /// sequence_no. Existing field values are never overwritten.
    fn insert_or_touch(&self, item: &NewStockItem) -> RepositoryResult<UpsertOutcome>;

    /// Manual entry plus its CREATED entry, both or neither; returns the new id.
    /// The entry's item_id is replaced by the new id.
    fn insert_audited(&self, item: &NewStockItem, entry: &NewAuditEntry) -> RepositoryResult<i64>;

    fn find_by_id(&self, id: i64) -> RepositoryResult<Option<StockItem>>;

    /// Append the entries and apply every present field of the patch atomically;
    /// returns the stored item
    fn update_audited(
        &self,
        id: i64,
        patch: &StockItemPatch,
        entries: &[NewAuditEntry],
    ) -> RepositoryResult<StockItem>;

    fn delete(&self, id: i64) -> RepositoryResult<bool>;

    fn list(&self, filter: &StockFilter) -> RepositoryResult<Page<StockItem>>;

    fn filter_values(&self) -> RepositoryResult<StockFilterValues>;

    /// Free items aged beyond the critical threshold and not yet notified
    fn find_critical(&self) -> RepositoryResult<Vec<StockItem>>;

    fn mark_notified(&self, ids: &[i64]) -> RepositoryResult<usize>;

    fn count(&self) -> RepositoryResult<u64>;
}

// ==========================================
// ScheduleStore
// ==========================================
pub trait ScheduleStore: Send + Sync {
    /// Delete every stored line and insert the given ones atomically
    fn replace_all(&self, items: &[NewScheduleItem]) -> RepositoryResult<usize>;

    fn list(&self) -> RepositoryResult<Vec<ScheduleItem>>;

    /// Distinct non-empty month labels and locations, alphabetical
    fn filter_values(&self) -> RepositoryResult<ScheduleFilterValues>;
}

// ==========================================
// AuditStore
// ==========================================
pub trait AuditStore: Send + Sync {
    fn append(&self, entry: &NewAuditEntry) -> RepositoryResult<i64>;

    /// Newest first
    fn list_for_item(&self, item_id: i64) -> RepositoryResult<Vec<AuditEntry>>;
}
