// ==========================================
// Stock Ledger - Arrival Schedule Domain Model
// ==========================================
// One expected-arrival order line. The whole set is replaced on every import.
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ScheduleItem - persisted order line
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: i64,
    pub order_ref: Option<String>,      // required at ingestion, nullable for manual rows
    pub model_id: Option<String>,       // external model id
    pub expected_month: Option<String>, // free-text month label
    pub model: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,       // destination
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// NewScheduleItem - candidate order line
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewScheduleItem {
    pub order_ref: Option<String>,
    pub model_id: Option<String>,
    pub expected_month: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
}

/// Distinct non-empty values offered as schedule filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleFilterValues {
    /// Vocabulary order, unknown labels last
    pub months: Vec<String>,
    /// Alphabetical
    pub locations: Vec<String>,
}

/// Month vocabulary used to group the schedule for display
pub const MONTHS: [&str; 12] = [
    "JANEIRO", "FEVEREIRO", "MARÇO", "ABRIL", "MAIO", "JUNHO",
    "JULHO", "AGOSTO", "SETEMBRO", "OUTUBRO", "NOVEMBRO", "DEZEMBRO",
];

/// Position (1..=12) of a month label in the vocabulary.
///
/// Labels are not validated against the vocabulary; unknown labels return None
/// and sort after every known month.
pub fn month_index(label: &str) -> Option<u32> {
    let normalized = label.trim().to_uppercase().replace('Ç', "C");
    MONTHS
        .iter()
        .position(|m| m.replace('Ç', "C") == normalized)
        .map(|i| i as u32 + 1)
}

impl ScheduleItem {
    /// Display ordering key: month position (unknown last), then insertion order
    pub fn display_key(&self) -> (u32, i64) {
        let month = self
            .expected_month
            .as_deref()
            .and_then(month_index)
            .unwrap_or(u32::MAX);
        (month, self.id)
    }
}
