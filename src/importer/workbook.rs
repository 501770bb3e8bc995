// ==========================================
// Stock Ledger - In-Memory Workbook Model
// ==========================================
// Decoded workbook: named sheets of untyped cells, addressed from A1.
// Produced by the file parser, consumed by the column mapper.
// ==========================================

use chrono::NaiveDateTime;

/// One untyped cell as stored in the workbook
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Date-formatted cell already decoded by the reader
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Empty, or text that is only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display text of the cell, as a spreadsheet would render it unformatted
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.date().format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

/// Integral numbers render without a decimal point
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ==========================================
// Sheet / Workbook
// ==========================================

/// One named tab. `rows[r][c]` is the cell at zero-based row r, column c.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// First sheet whose trimmed name contains `pattern` (case-insensitive)
    pub fn find_sheet(&self, pattern: &str) -> Option<&Sheet> {
        let needle = pattern.trim().to_uppercase();
        self.sheets
            .iter()
            .find(|s| s.name.trim().to_uppercase().contains(&needle))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}
