// ==========================================
// Stock Ledger - Import API
// ==========================================
// preview: bytes/file -> candidate records + warnings (no writes)
// commit:  reviewed records -> stock upsert + schedule replace
// ==========================================

use crate::api::error::ApiResult;
use crate::config::ImportConfigReader;
use crate::domain::{ImportMode, NewScheduleItem, NewStockItem};
use crate::engine::{BulkReconciler, ScheduleImportSummary, StockImportSummary};
use crate::importer::{RecordBuilder, SheetWarning, Workbook, WorkbookParser};
use crate::repository::{ScheduleStore, StockStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, Span};
use uuid::Uuid;

/// Number of records shown in the preview sample of each set
pub const PREVIEW_SAMPLE_SIZE: usize = 5;

/// Preview returned before commit
#[derive(Debug, Clone, Serialize)]
pub struct ImportPreview {
    pub stock_items: Vec<NewStockItem>,
    pub schedule_items: Vec<NewScheduleItem>,
    pub warnings: Vec<SheetWarning>,
    pub stock_count: usize,
    pub schedule_count: usize,
    pub stock_sample: Vec<NewStockItem>,
    pub schedule_sample: Vec<NewScheduleItem>,
}

/// Records submitted after review
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitRequest {
    #[serde(default)]
    pub stock_items: Vec<NewStockItem>,
    #[serde(default)]
    pub schedule_items: Vec<NewScheduleItem>,
    #[serde(default)]
    pub mode: ImportMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitResult {
    pub batch_id: String,
    pub mode: ImportMode,
    pub stock: StockImportSummary,
    pub schedule: ScheduleImportSummary,
}

// ==========================================
// ImportApi
// ==========================================
pub struct ImportApi {
    parser: WorkbookParser,
    config: Arc<dyn ImportConfigReader>,
    stock_store: Arc<dyn StockStore>,
    schedule_store: Arc<dyn ScheduleStore>,
}

impl ImportApi {
    pub fn new(
        config: Arc<dyn ImportConfigReader>,
        stock_store: Arc<dyn StockStore>,
        schedule_store: Arc<dyn ScheduleStore>,
    ) -> Self {
        Self {
            parser: WorkbookParser,
            config,
            stock_store,
            schedule_store,
        }
    }

    /// Preview an uploaded workbook
    pub fn preview_bytes(&self, bytes: &[u8]) -> ApiResult<ImportPreview> {
        let workbook = self.parser.parse_bytes(bytes)?;
        self.preview_workbook(&workbook)
    }

    /// Preview a workbook file
    pub fn preview_file<P: AsRef<Path>>(&self, path: P) -> ApiResult<ImportPreview> {
        let workbook = self.parser.parse_file(path)?;
        self.preview_workbook(&workbook)
    }

    pub fn preview_workbook(&self, workbook: &Workbook) -> ApiResult<ImportPreview> {
        let settings = self.config.import_settings()?;
        let parsed = RecordBuilder::new(settings).build(workbook);

        info!(
            stock = parsed.stock_items.len(),
            schedule = parsed.schedule_items.len(),
            warnings = parsed.warnings.len(),
            "import preview ready"
        );

        Ok(ImportPreview {
            stock_count: parsed.stock_items.len(),
            schedule_count: parsed.schedule_items.len(),
            stock_sample: parsed.stock_items.iter().take(PREVIEW_SAMPLE_SIZE).cloned().collect(),
            schedule_sample: parsed
                .schedule_items
                .iter()
                .take(PREVIEW_SAMPLE_SIZE)
                .cloned()
                .collect(),
            stock_items: parsed.stock_items,
            schedule_items: parsed.schedule_items,
            warnings: parsed.warnings,
        })
    }

    /// Persist reviewed records.
    ///
    /// Stock is upserted in both modes; the schedule is always replaced.
    #[instrument(skip(self, request), fields(batch_id, mode = ?request.mode))]
    pub fn commit(&self, request: &CommitRequest) -> ApiResult<CommitResult> {
        let batch_id = Uuid::new_v4().to_string();
        Span::current().record("batch_id", batch_id.as_str());

        let settings = self.config.import_settings()?;
        let reconciler = BulkReconciler::new(self.stock_store.clone(), self.schedule_store.clone())
            .with_max_error_messages(settings.max_error_messages);

        let stock = reconciler.reconcile_stock(&request.stock_items);
        let schedule = reconciler.reconcile_schedule(&request.schedule_items)?;

        info!(
            batch_id = %batch_id,
            stock_imported = stock.imported,
            stock_skipped = stock.skipped,
            schedule_imported = schedule.imported,
            "import committed"
        );

        Ok(CommitResult {
            batch_id,
            mode: request.mode,
            stock,
            schedule,
        })
    }

    /// Preview then commit everything the preview produced
    pub fn import_file<P: AsRef<Path>>(
        &self,
        path: P,
        mode: ImportMode,
    ) -> ApiResult<(ImportPreview, CommitResult)> {
        let preview = self.preview_file(path)?;
        let result = self.commit(&CommitRequest {
            stock_items: preview.stock_items.clone(),
            schedule_items: preview.schedule_items.clone(),
            mode,
        })?;
        Ok((preview, result))
    }
}
