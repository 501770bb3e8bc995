// ==========================================
// Stock Ledger - Stock Item Domain Model
// ==========================================
// One inventory unit (vehicle) as persisted, as produced by ingestion,
// and as a partial edit proposal.
// ==========================================

use crate::domain::types::StockStatus;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

// ==========================================
// StockItem - persisted stock unit
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: i64,

    // ===== Source workbook columns =====
    pub sequence_no: Option<i64>,          // row order in the source sheet (natural key)
    pub invoice_no: Option<String>,        // invoice reference
    pub invoice_date: Option<NaiveDate>,   // invoice issue date
    pub model_code: Option<String>,        // internal model code
    pub model: Option<String>,             // free-text model description
    pub model_year: Option<String>,        // e.g. "25/26"
    pub color: Option<String>,
    pub chassis: Option<String>,           // external identifier
    pub arrival_date: Option<NaiveDate>,   // arrival at the yard
    pub current_date: Option<NaiveDate>,   // reference date of the snapshot
    pub status: StockStatus,
    pub days_in_stock: Option<i64>,        // signed, magnitude is meaningful
    pub days_in_yard: Option<i64>,
    pub customer: Option<String>,
    pub physical_location: Option<String>,
    pub note: Option<String>,

    // ===== Equipment =====
    pub implement: Option<String>,
    pub tire: Option<String>,
    pub deflector: Option<String>,

    // ===== Bookkeeping =====
    pub notified: bool, // critical-age notification already sent
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// NewStockItem - candidate record (ingestion or manual entry)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewStockItem {
    pub sequence_no: Option<i64>,
    pub invoice_no: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub model_code: Option<String>,
    pub model: Option<String>,
    pub model_year: Option<String>,
    pub color: Option<String>,
    pub chassis: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub current_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: StockStatus,
    pub days_in_stock: Option<i64>,
    pub days_in_yard: Option<i64>,
    pub customer: Option<String>,
    pub physical_location: Option<String>,
    pub note: Option<String>,
    pub implement: Option<String>,
    pub tire: Option<String>,
    pub deflector: Option<String>,
}

// ==========================================
// StockItemPatch - partial edit proposal
// ==========================================
// Outer Option: field present in the proposal or not.
// Inner Option: proposed value may be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockItemPatch {
    #[serde(default, deserialize_with = "present")]
    pub sequence_no: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub invoice_no: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub invoice_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub model_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub model: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub model_year: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub chassis: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub arrival_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub current_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub status: Option<StockStatus>,
    #[serde(default, deserialize_with = "present")]
    pub days_in_stock: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub days_in_yard: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub customer: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub physical_location: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub note: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub implement: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub tire: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub deflector: Option<Option<String>>,
}

/// A key that appears in the payload is present, even when its value is null
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn assign<T: Clone>(target: &mut T, proposed: &Option<T>) {
    if let Some(value) = proposed {
        *target = value.clone();
    }
}

impl StockItemPatch {
    /// True when the proposal carries no field at all
    pub fn is_empty(&self) -> bool {
        *self == StockItemPatch::default()
    }
}

impl StockItem {
    /// Apply every field present in the proposal (tracked or not)
    pub fn apply_patch(&mut self, patch: &StockItemPatch) {
        assign(&mut self.sequence_no, &patch.sequence_no);
        assign(&mut self.invoice_no, &patch.invoice_no);
        assign(&mut self.invoice_date, &patch.invoice_date);
        assign(&mut self.model_code, &patch.model_code);
        assign(&mut self.model, &patch.model);
        assign(&mut self.model_year, &patch.model_year);
        assign(&mut self.color, &patch.color);
        assign(&mut self.chassis, &patch.chassis);
        assign(&mut self.arrival_date, &patch.arrival_date);
        assign(&mut self.current_date, &patch.current_date);
        assign(&mut self.status, &patch.status);
        assign(&mut self.days_in_stock, &patch.days_in_stock);
        assign(&mut self.days_in_yard, &patch.days_in_yard);
        assign(&mut self.customer, &patch.customer);
        assign(&mut self.physical_location, &patch.physical_location);
        assign(&mut self.note, &patch.note);
        assign(&mut self.implement, &patch.implement);
        assign(&mut self.tire, &patch.tire);
        assign(&mut self.deflector, &patch.deflector);
    }

    /// Materialize a persisted item from a candidate record
    pub fn from_new(id: i64, item: &NewStockItem, now: NaiveDateTime) -> Self {
        Self {
            id,
            sequence_no: item.sequence_no,
            invoice_no: item.invoice_no.clone(),
            invoice_date: item.invoice_date,
            model_code: item.model_code.clone(),
            model: item.model.clone(),
            model_year: item.model_year.clone(),
            color: item.color.clone(),
            chassis: item.chassis.clone(),
            arrival_date: item.arrival_date,
            current_date: item.current_date,
            status: item.status,
            days_in_stock: item.days_in_stock,
            days_in_yard: item.days_in_yard,
            customer: item.customer.clone(),
            physical_location: item.physical_location.clone(),
            note: item.note.clone(),
            implement: item.implement.clone(),
            tire: item.tire.clone(),
            deflector: item.deflector.clone(),
            notified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stock age beyond this many days is critical
    pub const CRITICAL_DAYS: i64 = 180;

    /// Free item whose stock age magnitude exceeds the critical threshold
    pub fn is_critical(&self) -> bool {
        self.status == StockStatus::Free
            && self
                .days_in_stock
                .map(|d| d.unsigned_abs() > Self::CRITICAL_DAYS.unsigned_abs())
                .unwrap_or(false)
    }
}

// ==========================================
// StockFilter - listing criteria
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StockFilter {
    pub search: Option<String>, // matches invoice/chassis/model/customer/code/location
    pub status: Option<StockStatus>,
    pub physical_location: Option<String>, // substring match
    pub color: Option<String>,             // substring match
    pub tire: Option<String>,              // substring match
    pub model_code: Option<String>,        // exact match
    pub days_in_stock_min: Option<i64>,
    pub days_in_stock_max: Option<i64>,
    pub order_by: StockSortKey,
    pub order_dir: SortDirection,
    pub page: u32,      // 1-based
    pub page_size: u32,
}

impl Default for StockFilter {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            physical_location: None,
            color: None,
            tire: None,
            model_code: None,
            days_in_stock_min: None,
            days_in_stock_max: None,
            order_by: StockSortKey::default(),
            order_dir: SortDirection::default(),
            page: 1,
            page_size: 50,
        }
    }
}

/// Sortable listing columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockSortKey {
    #[default]
    SequenceNo,
    InvoiceNo,
    Model,
    Color,
    Status,
    DaysInStock,
    DaysInYard,
    ArrivalDate,
    Customer,
    PhysicalLocation,
}

impl StockSortKey {
    /// Column name in stock_item
    pub fn column(&self) -> &'static str {
        match self {
            StockSortKey::SequenceNo => "sequence_no",
            StockSortKey::InvoiceNo => "invoice_no",
            StockSortKey::Model => "model",
            StockSortKey::Color => "color",
            StockSortKey::Status => "status",
            StockSortKey::DaysInStock => "days_in_stock",
            StockSortKey::DaysInYard => "days_in_yard",
            StockSortKey::ArrivalDate => "arrival_date",
            StockSortKey::Customer => "customer",
            StockSortKey::PhysicalLocation => "physical_location",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Distinct non-empty values offered as listing filters, alphabetical
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockFilterValues {
    pub locations: Vec<String>,
    pub colors: Vec<String>,
    pub tires: Vec<String>,
    pub model_codes: Vec<String>,
}

/// One page of a listing plus the total number of matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> StockItem {
        let now = chrono::NaiveDate::from_ymd_opt(2026, 2, 19)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        StockItem::from_new(
            7,
            &NewStockItem {
                sequence_no: Some(1),
                customer: Some("ACME".to_string()),
                days_in_stock: Some(-200),
                ..Default::default()
            },
            now,
        )
    }

    #[test]
    fn test_patch_distinguishes_absent_and_null() {
        let patch: StockItemPatch =
            serde_json::from_str(r#"{"customer": null, "note": "ok"}"#).unwrap();
        assert_eq!(patch.customer, Some(None));
        assert_eq!(patch.note, Some(Some("ok".to_string())));
        assert_eq!(patch.color, None);
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_apply_patch_only_touches_present_fields() {
        let mut item = sample_item();
        let patch = StockItemPatch {
            customer: Some(None),
            status: Some(StockStatus::Sold),
            ..Default::default()
        };
        item.apply_patch(&patch);
        assert_eq!(item.customer, None);
        assert_eq!(item.status, StockStatus::Sold);
        assert_eq!(item.sequence_no, Some(1));
    }

    #[test]
    fn test_is_critical_uses_magnitude() {
        let mut item = sample_item();
        assert!(item.is_critical());
        item.status = StockStatus::Reserved;
        assert!(!item.is_critical());
    }

    #[test]
    fn test_filter_deserializes_with_defaults() {
        let filter: StockFilter =
            serde_json::from_str(r#"{"color": "VERDE", "order_by": "days_in_stock", "order_dir": "desc"}"#)
                .unwrap();
        assert_eq!(filter.color.as_deref(), Some("VERDE"));
        assert_eq!(filter.order_by.column(), "days_in_stock");
        assert_eq!(filter.order_dir, SortDirection::Desc);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.page_size, 50);
    }

    #[test]
    fn test_is_critical_at_integer_bounds() {
        let mut item = sample_item();
        item.days_in_stock = Some(i64::MIN);
        assert!(item.is_critical());
        item.days_in_stock = Some(-180);
        assert!(!item.is_critical());
    }
}
