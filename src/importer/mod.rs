// ==========================================
// Stock Ledger - Import Layer
// ==========================================
// Spreadsheet bytes -> workbook grid -> candidate records.
// Nothing here touches storage.
// ==========================================

pub mod coercion;
pub mod column_mapper;
pub mod error;
pub mod file_parser;
pub mod record_builder;
pub mod workbook;

pub use coercion::DateOrder;
pub use column_mapper::{ColumnMapper, SheetLayout};
pub use error::{ImportError, ImportResult};
pub use file_parser::WorkbookParser;
pub use record_builder::{ParsedWorkbook, RecordBuilder, SheetWarning};
pub use workbook::{CellValue, Sheet, Workbook};
