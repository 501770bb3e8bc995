// ==========================================
// Stock Ledger - Stock Item Repository
// ==========================================
// Table: stock_item (natural key: sequence_no, unique when present)
// ==========================================

mod core;
mod queries;


pub use core::StockItemRepository;

use crate::domain::{
    NewAuditEntry, NewStockItem, Page, StockFilter, StockFilterValues, StockItem, StockItemPatch,
};
use crate::repository::error::RepositoryResult;
use crate::repository::store::{StockStore, UpsertOutcome};

impl StockStore for StockItemRepository {
    fn insert_or_touch(&self, item: &NewStockItem) -> RepositoryResult<UpsertOutcome> {
        StockItemRepository::insert_or_touch(self, item)
    }

    fn insert_audited(&self, item: &NewStockItem, entry: &NewAuditEntry) -> RepositoryResult<i64> {
        StockItemRepository::insert_audited(self, item, entry)
    }

    fn find_by_id(&self, id: i64) -> RepositoryResult<Option<StockItem>> {
        StockItemRepository::find_by_id(self, id)
    }

    fn update_audited(
        &self,
        id: i64,
        patch: &StockItemPatch,
        entries: &[NewAuditEntry],
    ) -> RepositoryResult<StockItem> {
        StockItemRepository::update_audited(self, id, patch, entries)
    }

    fn delete(&self, id: i64) -> RepositoryResult<bool> {
        StockItemRepository::delete(self, id)
    }

    fn list(&self, filter: &StockFilter) -> RepositoryResult<Page<StockItem>> {
        StockItemRepository::list(self, filter)
    }

    fn filter_values(&self) -> RepositoryResult<StockFilterValues> {
        StockItemRepository::filter_values(self)
    }

    fn find_critical(&self) -> RepositoryResult<Vec<StockItem>> {
        StockItemRepository::find_critical(self)
    }

    fn mark_notified(&self, ids: &[i64]) -> RepositoryResult<usize> {
        StockItemRepository::mark_notified(self, ids)
    }

    fn count(&self) -> RepositoryResult<u64> {
        StockItemRepository::count(self)
    }
}
