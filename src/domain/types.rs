// ==========================================
// Stock Ledger - Domain Types
// ==========================================
// Enumerations shared by stock items and the audit trail.
// Stored form: the upper-case tokens used by the source workbooks.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// StockStatus - commercial status of a stock unit
// ==========================================
// Unknown or missing source text resolves to Free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StockStatus {
    #[default]
    #[serde(rename = "LIVRE")]
    Free, // available for sale
    #[serde(rename = "RESERVADO")]
    Reserved, // held for a customer
    #[serde(rename = "VENDIDO")]
    Sold, // sold, still physically in stock
}

impl StockStatus {
    /// Token used in storage, audit values and workbooks
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Free => "LIVRE",
            StockStatus::Reserved => "RESERVADO",
            StockStatus::Sold => "VENDIDO",
        }
    }

    /// Lenient decoding of a stored token (unrecognized values fall back to Free)
    pub fn from_db(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LIVRE" => Ok(StockStatus::Free),
            "RESERVADO" => Ok(StockStatus::Reserved),
            "VENDIDO" => Ok(StockStatus::Sold),
            other => Err(format!("unknown stock status: {}", other)),
        }
    }
}

// ==========================================
// AuditEventType - category of an audit entry
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    StatusChange,   // status field changed
    CustomerChange, // customer field changed
    LocationChange, // physical location changed
    FieldChange,    // any other tracked field changed
    Created,        // item registered manually
    Edited,         // free-text note appended by a user
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::StatusChange => "STATUS_CHANGE",
            AuditEventType::CustomerChange => "CUSTOMER_CHANGE",
            AuditEventType::LocationChange => "LOCATION_CHANGE",
            AuditEventType::FieldChange => "FIELD_CHANGE",
            AuditEventType::Created => "CREATED",
            AuditEventType::Edited => "EDITED",
        }
    }

    /// Whether entries of this category name the changed field
    pub fn carries_field(&self) -> bool {
        !matches!(self, AuditEventType::Created | AuditEventType::Edited)
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "STATUS_CHANGE" => Ok(AuditEventType::StatusChange),
            "CUSTOMER_CHANGE" => Ok(AuditEventType::CustomerChange),
            "LOCATION_CHANGE" => Ok(AuditEventType::LocationChange),
            "FIELD_CHANGE" => Ok(AuditEventType::FieldChange),
            "CREATED" => Ok(AuditEventType::Created),
            "EDITED" => Ok(AuditEventType::Edited),
            other => Err(format!("unknown audit event type: {}", other)),
        }
    }
}

// ==========================================
// ImportMode - commit mode requested by the caller
// ==========================================
// Stock reconciliation is an upsert in both modes; the schedule is always replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Add,
    Replace,
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(ImportMode::Add),
            "replace" => Ok(ImportMode::Replace),
            other => Err(format!("unknown import mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_round_trip_tokens() {
        assert_eq!(StockStatus::Reserved.as_str(), "RESERVADO");
        assert_eq!("vendido".parse::<StockStatus>().unwrap(), StockStatus::Sold);
        assert_eq!(StockStatus::from_db("???"), StockStatus::Free);
    }

    #[test]
    fn test_stock_status_serde_uses_tokens() {
        let json = serde_json::to_string(&StockStatus::Reserved).unwrap();
        assert_eq!(json, "\"RESERVADO\"");
        let back: StockStatus = serde_json::from_str("\"LIVRE\"").unwrap();
        assert_eq!(back, StockStatus::Free);
    }

    #[test]
    fn test_event_type_carries_field() {
        assert!(AuditEventType::StatusChange.carries_field());
        assert!(AuditEventType::FieldChange.carries_field());
        assert!(!AuditEventType::Created.carries_field());
        assert!(!AuditEventType::Edited.carries_field());
    }

    #[test]
    fn test_import_mode_parse() {
        assert_eq!("ADD".parse::<ImportMode>().unwrap(), ImportMode::Add);
        assert_eq!("replace".parse::<ImportMode>().unwrap(), ImportMode::Replace);
        assert!("merge".parse::<ImportMode>().is_err());
    }
}
