// ==========================================
// Stock Ledger - Cell Type Coercion
// ==========================================
// Pure functions: untyped cell -> domain type or None.
// Never fail; anything unusable becomes None (or Free for status).
// ==========================================

use crate::domain::types::StockStatus;
use crate::importer::workbook::CellValue;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Field order of locale-formatted dates (`10/01/2024`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateOrder {
    #[default]
    DayFirst, // dd/mm/yyyy (pt-BR)
    MonthFirst, // mm/dd/yyyy
}

impl FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DAY_FIRST" | "DMY" => Ok(DateOrder::DayFirst),
            "MONTH_FIRST" | "MDY" => Ok(DateOrder::MonthFirst),
            other => Err(format!("unknown date order: {}", other)),
        }
    }
}

// ==========================================
// Text
// ==========================================

/// Trimmed text, truncated to `max_len` characters.
///
/// Empty cells, whitespace and the literal tokens `null`/`undefined` map to None.
pub fn as_text(value: &CellValue, max_len: Option<usize>) -> Option<String> {
    let raw = match value {
        CellValue::Empty => return None,
        other => other.display_text(),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" || trimmed == "undefined" {
        return None;
    }
    Some(match max_len {
        Some(max) => trimmed.chars().take(max).collect(),
        None => trimmed.to_string(),
    })
}

// ==========================================
// Integer
// ==========================================

/// Base-10 integer.
///
/// Numbers truncate toward zero; text uses its leading integer prefix
/// (`"45 dias"` -> 45). Anything else is None.
pub fn as_integer(value: &CellValue) -> Option<i64> {
    match value {
        CellValue::Number(n) => {
            if !n.is_finite() || n.abs() >= i64::MAX as f64 {
                return None;
            }
            Some(n.trunc() as i64)
        }
        CellValue::Text(s) => parse_integer_prefix(s),
        _ => None,
    }
}

fn parse_integer_prefix(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for ch in digits.chars() {
        let Some(d) = ch.to_digit(10) else { break };
        value = value.checked_mul(10)?.checked_add(d as i64)?;
        seen = true;
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

// ==========================================
// Date
// ==========================================

/// Calendar date using the default (day-first) locale order
pub fn as_date(value: &CellValue) -> Option<NaiveDate> {
    as_date_in(value, DateOrder::default())
}

/// Calendar date from a serial number, a typed date cell or date text
pub fn as_date_in(value: &CellValue, order: DateOrder) -> Option<NaiveDate> {
    match value {
        CellValue::Empty | CellValue::Bool(_) => None,
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Number(n) => serial_to_date(*n),
        CellValue::Text(s) => parse_date_text(s, order),
    }
}

/// Decode a 1900-system spreadsheet serial (time fraction discarded).
///
/// Serial 60 is the phantom 1900-02-29 and has no calendar date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial >= 2_958_466.0 {
        return None;
    }
    let days = serial.floor() as i64;
    let (base, offset) = match days {
        1..=59 => (NaiveDate::from_ymd_opt(1899, 12, 31)?, days),
        60 => return None,
        _ => (NaiveDate::from_ymd_opt(1899, 12, 30)?, days),
    };
    base.checked_add_signed(Duration::days(offset))
}

const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"];

fn parse_date_text(text: &str, order: DateOrder) -> Option<NaiveDate> {
    let s = text.trim();
    if s.is_empty() || s == "null" {
        return None;
    }

    // ISO, optionally followed by a time part
    let head = s.split(|c| c == 'T' || c == ' ').next().unwrap_or(s);
    if let Ok(d) = NaiveDate::parse_from_str(head, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(head, "%Y/%m/%d") {
        return Some(d);
    }

    // Compact YYYYMMDD
    if head.len() == 8 && head.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(d) = NaiveDate::parse_from_str(head, "%Y%m%d") {
            return Some(d);
        }
    }

    let formats = match order {
        DateOrder::DayFirst => DAY_FIRST_FORMATS,
        DateOrder::MonthFirst => MONTH_FIRST_FORMATS,
    };
    formats
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(head, f).ok())
}

// ==========================================
// Status
// ==========================================

/// Substring match on the upper-cased text; anything else is Free
pub fn as_status(value: &CellValue) -> StockStatus {
    let Some(text) = as_text(value, None) else {
        return StockStatus::Free;
    };
    let upper = text.to_uppercase();
    if upper.contains("RESERVADO") {
        StockStatus::Reserved
    } else if upper.contains("VENDIDO") {
        StockStatus::Sold
    } else {
        StockStatus::Free
    }
}
