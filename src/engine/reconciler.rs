// ==========================================
// Stock Ledger - Bulk Reconciler
// ==========================================
// Merges a validated batch into storage:
// - stock: per-record upsert on sequence_no, failures isolated per record
// - schedule: full replace in one transaction
// Records are applied sequentially so counters and the capped error list
// stay deterministic.
// ==========================================

use crate::config::DEFAULT_MAX_ERROR_MESSAGES;
use crate::domain::{NewScheduleItem, NewStockItem};
use crate::i18n::t_with_args;
use crate::repository::{RepositoryResult, ScheduleStore, StockStore, UpsertOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a stock batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockImportSummary {
    /// Inserted plus touched
    pub imported: usize,
    pub skipped: usize,
    /// First failures only, see `max_error_messages`
    pub errors: Vec<String>,
}

/// Outcome of a schedule batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleImportSummary {
    pub imported: usize,
}

// ==========================================
// BulkReconciler
// ==========================================
pub struct BulkReconciler {
    stock_store: Arc<dyn StockStore>,
    schedule_store: Arc<dyn ScheduleStore>,
    max_error_messages: usize,
}

impl BulkReconciler {
    pub fn new(stock_store: Arc<dyn StockStore>, schedule_store: Arc<dyn ScheduleStore>) -> Self {
        Self {
            stock_store,
            schedule_store,
            max_error_messages: DEFAULT_MAX_ERROR_MESSAGES,
        }
    }

    pub fn with_max_error_messages(mut self, max: usize) -> Self {
        self.max_error_messages = max;
        self
    }

    /// Upsert every record; one failing record never aborts the batch
    pub fn reconcile_stock(&self, items: &[NewStockItem]) -> StockImportSummary {
        let mut summary = StockImportSummary::default();
        let mut inserted = 0usize;

        for item in items {
            match self.stock_store.insert_or_touch(item) {
                Ok(outcome) => {
                    summary.imported += 1;
                    if let UpsertOutcome::Inserted(_) = outcome {
                        inserted += 1;
                    }
                }
                Err(e) => {
                    summary.skipped += 1;
                    warn!(sequence_no = ?item.sequence_no, error = %e, "stock record skipped");
                    if summary.errors.len() < self.max_error_messages {
                        let sequence = item
                            .sequence_no
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        summary.errors.push(t_with_args(
                            "import.row_failed",
                            &[("sequence", sequence.as_str()), ("message", e.to_string().as_str())],
                        ));
                    }
                }
            }
        }

        info!(
            total = items.len(),
            imported = summary.imported,
            inserted,
            skipped = summary.skipped,
            "stock batch reconciled"
        );
        summary
    }

    /// Replace the stored schedule with the batch.
    ///
    /// An empty batch leaves the stored schedule untouched, so importing a
    /// workbook without a schedule sheet does not wipe the plan.
    pub fn reconcile_schedule(
        &self,
        items: &[NewScheduleItem],
    ) -> RepositoryResult<ScheduleImportSummary> {
        if items.is_empty() {
            debug!("empty schedule batch, stored schedule kept");
            return Ok(ScheduleImportSummary::default());
        }
        let imported = self.schedule_store.replace_all(items)?;
        info!(imported, "schedule replaced");
        Ok(ScheduleImportSummary { imported })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{
        NewAuditEntry, Page, ScheduleFilterValues, ScheduleItem, StockFilter, StockFilterValues,
        StockItem, StockItemPatch,
    };
    use crate::repository::RepositoryError;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory stock store; sequence numbers listed in `failing` are rejected.
    /// Audit entries written with an item land in `audit`.
    #[derive(Default)]
    pub(crate) struct MemoryStockStore {
        pub items: Mutex<HashMap<i64, StockItem>>,
        pub audit: Mutex<Vec<NewAuditEntry>>,
        pub failing: Vec<i64>,
        next_id: Mutex<i64>,
    }

    impl MemoryStockStore {
        pub fn failing_on(sequence_nos: &[i64]) -> Self {
            Self {
                failing: sequence_nos.to_vec(),
                ..Default::default()
            }
        }

        pub fn insert(&self, item: &NewStockItem) -> RepositoryResult<i64> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let id = *next_id;
            self.items
                .lock()
                .unwrap()
                .insert(id, StockItem::from_new(id, item, Self::now()));
            Ok(id)
        }

        fn now() -> chrono::NaiveDateTime {
            NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        }
    }

    impl StockStore for MemoryStockStore {
        fn insert_or_touch(&self, item: &NewStockItem) -> RepositoryResult<UpsertOutcome> {
            if let Some(seq) = item.sequence_no {
                if self.failing.contains(&seq) {
                    return Err(RepositoryError::DatabaseQueryError(format!("disk full at {}", seq)));
                }
                let items = self.items.lock().unwrap();
                if let Some(existing) = items.values().find(|i| i.sequence_no == Some(seq)) {
                    return Ok(UpsertOutcome::Touched(existing.id));
                }
            }
            self.insert(item).map(UpsertOutcome::Inserted)
        }

        fn insert_audited(
            &self,
            item: &NewStockItem,
            entry: &NewAuditEntry,
        ) -> RepositoryResult<i64> {
            let id = self.insert(item)?;
            self.audit.lock().unwrap().push(NewAuditEntry {
                item_id: id,
                ..entry.clone()
            });
            Ok(id)
        }

        fn find_by_id(&self, id: i64) -> RepositoryResult<Option<StockItem>> {
            Ok(self.items.lock().unwrap().get(&id).cloned())
        }

        /// Same unique rule as the sequence_no index; nothing is kept on failure
        fn update_audited(
            &self,
            id: i64,
            patch: &StockItemPatch,
            entries: &[NewAuditEntry],
        ) -> RepositoryResult<StockItem> {
            let mut items = self.items.lock().unwrap();
            if let Some(Some(seq)) = patch.sequence_no {
                if items.values().any(|i| i.id != id && i.sequence_no == Some(seq)) {
                    return Err(RepositoryError::UniqueConstraintViolation(format!(
                        "stock_item.sequence_no = {}",
                        seq
                    )));
                }
            }
            let item = items
                .get_mut(&id)
                .ok_or_else(|| RepositoryError::not_found("stock_item", id))?;
            item.apply_patch(patch);
            self.audit.lock().unwrap().extend_from_slice(entries);
            Ok(item.clone())
        }

        fn delete(&self, id: i64) -> RepositoryResult<bool> {
            Ok(self.items.lock().unwrap().remove(&id).is_some())
        }

        fn list(&self, _filter: &StockFilter) -> RepositoryResult<Page<StockItem>> {
            let mut data: Vec<_> = self.items.lock().unwrap().values().cloned().collect();
            data.sort_by_key(|i| i.id);
            let total = data.len() as u64;
            Ok(Page { data, total })
        }

        fn filter_values(&self) -> RepositoryResult<StockFilterValues> {
            Ok(StockFilterValues::default())
        }

        fn find_critical(&self) -> RepositoryResult<Vec<StockItem>> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .values()
                .filter(|i| i.is_critical() && !i.notified)
                .cloned()
                .collect())
        }

        fn mark_notified(&self, ids: &[i64]) -> RepositoryResult<usize> {
            let mut items = self.items.lock().unwrap();
            let mut count = 0;
            for id in ids {
                if let Some(i) = items.get_mut(id) {
                    i.notified = true;
                    count += 1;
                }
            }
            Ok(count)
        }

        fn count(&self) -> RepositoryResult<u64> {
            Ok(self.items.lock().unwrap().len() as u64)
        }
    }

    #[derive(Default)]
    pub(crate) struct MemoryScheduleStore {
        pub items: Mutex<Vec<NewScheduleItem>>,
    }

    impl ScheduleStore for MemoryScheduleStore {
        fn replace_all(&self, items: &[NewScheduleItem]) -> RepositoryResult<usize> {
            *self.items.lock().unwrap() = items.to_vec();
            Ok(items.len())
        }

        fn list(&self) -> RepositoryResult<Vec<ScheduleItem>> {
            Ok(Vec::new())
        }

        fn filter_values(&self) -> RepositoryResult<ScheduleFilterValues> {
            Ok(ScheduleFilterValues::default())
        }
    }

    fn stock(seq: i64) -> NewStockItem {
        NewStockItem {
            sequence_no: Some(seq),
            ..Default::default()
        }
    }

    fn reconciler(stock_store: Arc<MemoryStockStore>) -> BulkReconciler {
        BulkReconciler::new(stock_store, Arc::new(MemoryScheduleStore::default()))
    }

    #[test]
    fn test_reconcile_stock_counts_all_records() {
        crate::logging::init_test();
        let store = Arc::new(MemoryStockStore::default());
        let summary = reconciler(store.clone()).reconcile_stock(&[stock(1), stock(2), stock(3)]);

        assert_eq!(summary.imported, 3);
        assert_eq!(summary.skipped, 0);
        assert!(summary.errors.is_empty());
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_reconcile_stock_is_idempotent() {
        let store = Arc::new(MemoryStockStore::default());
        let r = reconciler(store.clone());
        let batch = [stock(1), stock(2)];

        r.reconcile_stock(&batch);
        let second = r.reconcile_stock(&batch);

        assert_eq!(second.imported, 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_failing_record_does_not_abort_batch() {
        let store = Arc::new(MemoryStockStore::failing_on(&[2]));
        let summary = reconciler(store.clone()).reconcile_stock(&[stock(1), stock(2), stock(3)]);

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("disk full at 2"));
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_error_list_is_capped() {
        let failing: Vec<i64> = (1..=15).collect();
        let store = Arc::new(MemoryStockStore::failing_on(&failing));
        let batch: Vec<_> = failing.iter().map(|s| stock(*s)).collect();

        let summary = reconciler(store).reconcile_stock(&batch);
        assert_eq!(summary.skipped, 15);
        assert_eq!(summary.errors.len(), DEFAULT_MAX_ERROR_MESSAGES);

        let store = Arc::new(MemoryStockStore::failing_on(&failing));
        let capped = reconciler(store).with_max_error_messages(3).reconcile_stock(&batch);
        assert_eq!(capped.errors.len(), 3);
    }

    #[test]
    fn test_reconcile_schedule_replaces_set() {
        let schedule = Arc::new(MemoryScheduleStore::default());
        let r = BulkReconciler::new(Arc::new(MemoryStockStore::default()), schedule.clone());
        let line = |r: &str| NewScheduleItem {
            order_ref: Some(r.to_string()),
            ..Default::default()
        };

        r.reconcile_schedule(&[line("P-1"), line("P-2")]).unwrap();
        let summary = r.reconcile_schedule(&[line("P-3")]).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(schedule.items.lock().unwrap().len(), 1);

        let empty = r.reconcile_schedule(&[]).unwrap();
        assert_eq!(empty.imported, 0);
        assert_eq!(schedule.items.lock().unwrap().len(), 1);
    }
}
