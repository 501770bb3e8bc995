// ==========================================
// Stock Ledger - Column Mapper
// ==========================================
// Locates the header row of a logical sheet by an exact marker cell and
// exposes the rows below it through fixed column offsets.
// Source workbooks carry titles, merged cells and spacer rows above the
// header, so only positions relative to the header are stable.
// ==========================================

use crate::importer::workbook::{CellValue, Sheet};
use serde::{Deserialize, Serialize};

static EMPTY_CELL: CellValue = CellValue::Empty;

// ==========================================
// SheetLayout - how to find and read one logical sheet
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Case-insensitive substring of the sheet name
    pub sheet_pattern: String,
    /// Exact (trimmed) text of the header marker cell
    pub marker: String,
    /// Offset of the marker column within the record layout
    pub marker_column: usize,
}

impl SheetLayout {
    pub fn new(sheet_pattern: &str, marker: &str, marker_column: usize) -> Self {
        Self {
            sheet_pattern: sheet_pattern.to_string(),
            marker: marker.to_string(),
            marker_column,
        }
    }
}

/// Position of the header row and of layout column 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLocation {
    pub row: usize,
    pub base_column: usize,
}

/// A non-blank row below the header
#[derive(Debug, Clone, Copy)]
pub struct DataRow<'a> {
    /// Zero-based row index in the sheet
    pub row_index: usize,
    cells: &'a [CellValue],
    base_column: usize,
}

impl<'a> DataRow<'a> {
    /// Cell at a layout offset; missing trailing cells read as empty
    pub fn cell(&self, offset: usize) -> &'a CellValue {
        self.cells
            .get(self.base_column + offset)
            .unwrap_or(&EMPTY_CELL)
    }
}

// ==========================================
// ColumnMapper
// ==========================================
pub struct ColumnMapper;

impl ColumnMapper {
    /// First row holding the marker; None when the sheet has no header.
    ///
    /// A marker left of its layout offset cannot anchor the table and is ignored.
    pub fn locate_header(&self, sheet: &Sheet, layout: &SheetLayout) -> Option<HeaderLocation> {
        let marker = layout.marker.trim();
        sheet.rows.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, c)| c.display_text().trim() == marker)
                .find_map(|(col, _)| col.checked_sub(layout.marker_column))
                .map(|base_column| HeaderLocation { row, base_column })
        })
    }

    /// Rows strictly after the header, blank rows skipped
    pub fn data_rows<'a>(
        &self,
        sheet: &'a Sheet,
        header: HeaderLocation,
    ) -> impl Iterator<Item = DataRow<'a>> + 'a {
        sheet
            .rows
            .iter()
            .enumerate()
            .skip(header.row + 1)
            .filter(|(_, cells)| !cells.iter().all(CellValue::is_blank))
            .map(move |(row_index, cells)| DataRow {
                row_index,
                cells,
                base_column: header.base_column,
            })
    }
}
