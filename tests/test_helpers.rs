// ==========================================
// Test helpers
// ==========================================
// Temporary database plus in-memory workbooks shaped like the
// supplier's export.
// ==========================================
#![allow(dead_code)]

use std::error::Error;
use stock_ledger::app::AppState;
use stock_ledger::importer::{CellValue, Sheet, Workbook};
use tempfile::NamedTempFile;

/// Temporary database file with the schema applied
///
/// Keep the NamedTempFile alive for as long as the path is used.
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("non-utf8 temp path")?
        .to_string();

    let conn = stock_ledger::db::open_sqlite_connection(&db_path)?;
    drop(conn);

    Ok((temp_file, db_path))
}

/// AppState over a fresh temporary database
pub fn create_test_state() -> (NamedTempFile, AppState) {
    let (file, path) = create_test_db().unwrap();
    let state = AppState::new(path).unwrap();
    (file, state)
}

pub fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

pub fn num(v: f64) -> CellValue {
    CellValue::Number(v)
}

/// One stock overview row in layout order
pub fn stock_row(seq: Option<f64>, invoice: &str, status: &str, days: f64, customer: &str) -> Vec<CellValue> {
    let mut row = vec![
        seq.map(num).unwrap_or(CellValue::Empty),
        text(invoice),
        text("2024-01-10"),
        text("M-100"),
        text("TRATOR 4X4"),
        text("24/25"),
        text("VERDE"),
        text(&format!("CH-{}", invoice)),
        num(45301.0), // 2024-01-10
        text("26/02/2024"),
        text(status),
        num(days),
        num(10.0),
        text(customer),
        text("YARD-A"),
        CellValue::Empty,
        text("GRADE"),
        text("R1"),
        CellValue::Empty,
    ];
    row.truncate(19);
    row
}

/// Stock sheet with title rows above the header
pub fn stock_sheet(rows: Vec<Vec<CellValue>>) -> Sheet {
    let mut all = vec![
        vec![text("RELATÓRIO GERAL DE ESTOQUE")],
        vec![],
        vec![
            text("#"),
            text("NF"),
            text("DATA NF"),
            text("CÓD"),
            text("MODELO"),
        ],
    ];
    all.extend(rows);
    Sheet::new("ESTOQUE GERAL", all)
}

/// Schedule sheet: (order ref, month)
pub fn schedule_sheet(lines: &[(&str, &str)]) -> Sheet {
    let mut rows = vec![vec![
        text("PEDIDO"),
        text("ID"),
        text("MÊS"),
        text("MODELO"),
        text("COR"),
        text("LOCAL"),
    ]];
    for (order_ref, month) in lines {
        rows.push(vec![
            text(order_ref),
            text("77"),
            text(month),
            text("COLHEITADEIRA"),
            text("AMARELA"),
            text("MATRIZ"),
        ]);
    }
    Sheet::new("PROGRAMA DE CHEGADAS", rows)
}

pub fn workbook(sheets: Vec<Sheet>) -> Workbook {
    Workbook::new(sheets)
}
