// ==========================================
// Stock Ledger - Record Builder
// ==========================================
// Workbook -> candidate stock items + schedule lines + sheet warnings.
// The two logical sheets are read independently: a missing sheet or
// header on one side never prevents reading the other.
// ==========================================

use crate::config::ImportSettings;
use crate::domain::{NewScheduleItem, NewStockItem};
use crate::i18n::t_with_args;
use crate::importer::coercion::{as_date_in, as_integer, as_status, as_text, DateOrder};
use crate::importer::column_mapper::{ColumnMapper, DataRow, SheetLayout};
use crate::importer::workbook::{Sheet, Workbook};
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::{debug, warn};

// ===== Stock overview layout (offsets from column 0) =====
mod stock_col {
    pub const SEQUENCE_NO: usize = 0;
    pub const INVOICE_NO: usize = 1;
    pub const INVOICE_DATE: usize = 2;
    pub const MODEL_CODE: usize = 3;
    pub const MODEL: usize = 4;
    pub const MODEL_YEAR: usize = 5;
    pub const COLOR: usize = 6;
    pub const CHASSIS: usize = 7;
    pub const ARRIVAL_DATE: usize = 8;
    pub const CURRENT_DATE: usize = 9;
    pub const STATUS: usize = 10;
    pub const DAYS_IN_STOCK: usize = 11;
    pub const DAYS_IN_YARD: usize = 12;
    pub const CUSTOMER: usize = 13;
    pub const PHYSICAL_LOCATION: usize = 14;
    pub const NOTE: usize = 15;
    pub const IMPLEMENT: usize = 16;
    pub const TIRE: usize = 17;
    pub const DEFLECTOR: usize = 18;
}

// ===== Arrival schedule layout =====
mod schedule_col {
    pub const ORDER_REF: usize = 0;
    pub const MODEL_ID: usize = 1;
    pub const EXPECTED_MONTH: usize = 2;
    pub const MODEL: usize = 3;
    pub const COLOR: usize = 4;
    pub const LOCATION: usize = 5;
}

// ==========================================
// SheetWarning - non-fatal structural problem
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetWarning {
    SheetNotFound { sheet: String },
    HeaderNotFound { sheet: String },
}

impl fmt::Display for SheetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SheetWarning::SheetNotFound { sheet } => {
                t_with_args("import.sheet_not_found", &[("sheet", sheet.as_str())])
            }
            SheetWarning::HeaderNotFound { sheet } => {
                t_with_args("import.header_not_found", &[("sheet", sheet.as_str())])
            }
        };
        f.write_str(&text)
    }
}

// Warnings reach the UI as localized strings
impl Serialize for SheetWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ==========================================
// ParsedWorkbook - builder output
// ==========================================
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedWorkbook {
    pub stock_items: Vec<NewStockItem>,
    pub schedule_items: Vec<NewScheduleItem>,
    pub warnings: Vec<SheetWarning>,
}

// ==========================================
// RecordBuilder
// ==========================================
pub struct RecordBuilder {
    settings: ImportSettings,
    mapper: ColumnMapper,
}

impl RecordBuilder {
    pub fn new(settings: ImportSettings) -> Self {
        Self {
            settings,
            mapper: ColumnMapper,
        }
    }

    /// Extract both record sets; never fails
    pub fn build(&self, workbook: &Workbook) -> ParsedWorkbook {
        let mut parsed = ParsedWorkbook::default();

        if let Some(rows) = self.rows_of(workbook, &self.settings.stock, &mut parsed.warnings) {
            let order = self.settings.date_order;
            parsed.stock_items = rows
                .iter()
                .filter_map(|row| build_stock_item(row, order))
                .collect();
        }

        if let Some(rows) = self.rows_of(workbook, &self.settings.schedule, &mut parsed.warnings) {
            parsed.schedule_items = rows.iter().filter_map(build_schedule_item).collect();
        }

        debug!(
            stock = parsed.stock_items.len(),
            schedule = parsed.schedule_items.len(),
            warnings = parsed.warnings.len(),
            "workbook records built"
        );
        parsed
    }

    /// Data rows of one logical sheet, or a warning
    fn rows_of<'a>(
        &self,
        workbook: &'a Workbook,
        layout: &SheetLayout,
        warnings: &mut Vec<SheetWarning>,
    ) -> Option<Vec<DataRow<'a>>> {
        let Some(sheet) = workbook.find_sheet(&layout.sheet_pattern) else {
            warn!(pattern = %layout.sheet_pattern, sheets = ?workbook.sheet_names(), "sheet not found");
            warnings.push(SheetWarning::SheetNotFound {
                sheet: layout.sheet_pattern.clone(),
            });
            return None;
        };
        self.rows_in_sheet(sheet, layout, warnings)
    }

    fn rows_in_sheet<'a>(
        &self,
        sheet: &'a Sheet,
        layout: &SheetLayout,
        warnings: &mut Vec<SheetWarning>,
    ) -> Option<Vec<DataRow<'a>>> {
        let Some(header) = self.mapper.locate_header(sheet, layout) else {
            warn!(sheet = %sheet.name, marker = %layout.marker, "header not found");
            warnings.push(SheetWarning::HeaderNotFound {
                sheet: sheet.name.clone(),
            });
            return None;
        };
        debug!(sheet = %sheet.name, row = header.row, base_column = header.base_column, "header located");
        Some(self.mapper.data_rows(sheet, header).collect())
    }
}

/// Stock row; rows without a usable sequence number are dropped
fn build_stock_item(row: &DataRow<'_>, order: DateOrder) -> Option<NewStockItem> {
    use stock_col::*;

    let sequence_no = as_integer(row.cell(SEQUENCE_NO))?;
    Some(NewStockItem {
        sequence_no: Some(sequence_no),
        invoice_no: as_text(row.cell(INVOICE_NO), Some(32)),
        invoice_date: as_date_in(row.cell(INVOICE_DATE), order),
        model_code: as_text(row.cell(MODEL_CODE), Some(32)),
        model: as_text(row.cell(MODEL), None),
        model_year: as_text(row.cell(MODEL_YEAR), Some(16)),
        color: as_text(row.cell(COLOR), Some(64)),
        chassis: as_text(row.cell(CHASSIS), Some(32)),
        arrival_date: as_date_in(row.cell(ARRIVAL_DATE), order),
        current_date: as_date_in(row.cell(CURRENT_DATE), order),
        status: as_status(row.cell(STATUS)),
        days_in_stock: as_integer(row.cell(DAYS_IN_STOCK)),
        days_in_yard: as_integer(row.cell(DAYS_IN_YARD)),
        customer: as_text(row.cell(CUSTOMER), Some(256)),
        physical_location: as_text(row.cell(PHYSICAL_LOCATION), Some(128)),
        note: as_text(row.cell(NOTE), None),
        implement: as_text(row.cell(IMPLEMENT), Some(128)),
        tire: as_text(row.cell(TIRE), Some(64)),
        deflector: as_text(row.cell(DEFLECTOR), Some(64)),
    })
}

/// Schedule row; rows without an order reference are dropped
fn build_schedule_item(row: &DataRow<'_>) -> Option<NewScheduleItem> {
    use schedule_col::*;

    let order_ref = as_text(row.cell(ORDER_REF), Some(32))?;
    Some(NewScheduleItem {
        order_ref: Some(order_ref),
        model_id: as_text(row.cell(MODEL_ID), Some(32)),
        expected_month: as_text(row.cell(EXPECTED_MONTH), Some(32)),
        model: as_text(row.cell(MODEL), None),
        color: as_text(row.cell(COLOR), Some(64)),
        location: as_text(row.cell(LOCATION), Some(128)),
    })
}
