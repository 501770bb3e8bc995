// ==========================================
// Stock Ledger - Workbook File Parser
// ==========================================
// Decodes raw workbook bytes (xlsx/xlsm/xls/ods) with calamine
// into the in-memory Workbook model.
// Cells keep absolute A1 coordinates: the used range is padded back
// to the sheet origin so that row/column offsets match the source file.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::workbook::{CellValue, Sheet, Workbook};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, instrument};

const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

// ==========================================
// WorkbookParser
// ==========================================
pub struct WorkbookParser;

impl WorkbookParser {
    /// Decode a workbook held in memory (upload body)
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Workbook> {
        if bytes.is_empty() {
            return Err(ImportError::WorkbookDecodeError("empty workbook".to_string()));
        }

        let mut sheets_reader = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let mut sheets = Vec::new();
        for name in sheets_reader.sheet_names() {
            let range = sheets_reader
                .worksheet_range(&name)
                .map_err(|e| ImportError::WorksheetReadError {
                    sheet: name.clone(),
                    message: e.to_string(),
                })?;
            let rows = range_to_rows(&range);
            debug!(sheet = %name, rows = rows.len(), "worksheet decoded");
            sheets.push(Sheet::new(name, rows));
        }

        Ok(Workbook::new(sheets))
    }

    /// Decode a workbook file from disk
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Workbook> {
        let path = file_path.as_ref();

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let bytes = std::fs::read(path)?;
        self.parse_bytes(&bytes)
    }
}

/// Rows of the used range, padded to absolute coordinates
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    for source_row in range.rows() {
        let mut row = vec![CellValue::Empty; start_col as usize];
        row.extend(source_row.iter().map(convert_cell));
        rows.push(row);
    }
    rows
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return CellValue::Number(dt.as_f64());
            }
            // Reader-side decoding honours the workbook's 1900/1904 epoch
            match dt.as_datetime() {
                Some(value) => CellValue::DateTime(value),
                None => CellValue::Number(dt.as_f64()),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_bytes_rejects_empty_input() {
        let result = WorkbookParser.parse_bytes(&[]);
        assert!(matches!(result, Err(ImportError::WorkbookDecodeError(_))));
    }

    #[test]
    fn test_parse_bytes_rejects_garbage() {
        let result = WorkbookParser.parse_bytes(b"definitely not a spreadsheet");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_file_not_found() {
        let result = WorkbookParser.parse_file("does_not_exist.xlsx");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_file_unsupported_extension() {
        let mut temp_file = NamedTempFile::with_suffix(".txt").unwrap();
        writeln!(temp_file, "NF;PEDIDO").unwrap();
        let result = WorkbookParser.parse_file(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_convert_cell_scalars() {
        assert_eq!(convert_cell(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            convert_cell(&Data::String("NF".to_string())),
            CellValue::Text("NF".to_string())
        );
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(convert_cell(&Data::Bool(true)), CellValue::Bool(true));
    }
}
