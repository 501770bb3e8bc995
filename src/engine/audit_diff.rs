// ==========================================
// Stock Ledger - Audit Diff Engine
// ==========================================
// Edit path for a single stock item:
//   read snapshot -> diff tracked fields -> entries + update in one write
// Fields outside TRACKED_FIELDS are written without an audit entry.
// ==========================================

use crate::domain::{
    Actor, AuditEventType, NewAuditEntry, StockItem, StockItemPatch,
};
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::StockStore;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// One audited field: category plus how to stringify both sides
struct TrackedField {
    name: &'static str,
    event_type: AuditEventType,
    prior: fn(&StockItem) -> Option<String>,
    /// None when the field is absent from the proposal
    proposed: fn(&StockItemPatch) -> Option<Option<String>>,
}

fn int_text(v: Option<i64>) -> Option<String> {
    v.map(|n| n.to_string())
}

fn date_text(v: Option<NaiveDate>) -> Option<String> {
    v.map(|d| d.format("%Y-%m-%d").to_string())
}

// Extend by adding rows
const TRACKED_FIELDS: [TrackedField; 13] = [
    TrackedField {
        name: "status",
        event_type: AuditEventType::StatusChange,
        prior: |i| Some(i.status.as_str().to_string()),
        proposed: |p| p.status.map(|s| Some(s.as_str().to_string())),
    },
    TrackedField {
        name: "customer",
        event_type: AuditEventType::CustomerChange,
        prior: |i| i.customer.clone(),
        proposed: |p| p.customer.clone(),
    },
    TrackedField {
        name: "physical_location",
        event_type: AuditEventType::LocationChange,
        prior: |i| i.physical_location.clone(),
        proposed: |p| p.physical_location.clone(),
    },
    TrackedField {
        name: "note",
        event_type: AuditEventType::FieldChange,
        prior: |i| i.note.clone(),
        proposed: |p| p.note.clone(),
    },
    TrackedField {
        name: "implement",
        event_type: AuditEventType::FieldChange,
        prior: |i| i.implement.clone(),
        proposed: |p| p.implement.clone(),
    },
    TrackedField {
        name: "tire",
        event_type: AuditEventType::FieldChange,
        prior: |i| i.tire.clone(),
        proposed: |p| p.tire.clone(),
    },
    TrackedField {
        name: "deflector",
        event_type: AuditEventType::FieldChange,
        prior: |i| i.deflector.clone(),
        proposed: |p| p.deflector.clone(),
    },
    TrackedField {
        name: "days_in_stock",
        event_type: AuditEventType::FieldChange,
        prior: |i| int_text(i.days_in_stock),
        proposed: |p| p.days_in_stock.map(int_text),
    },
    TrackedField {
        name: "days_in_yard",
        event_type: AuditEventType::FieldChange,
        prior: |i| int_text(i.days_in_yard),
        proposed: |p| p.days_in_yard.map(int_text),
    },
    TrackedField {
        name: "arrival_date",
        event_type: AuditEventType::FieldChange,
        prior: |i| date_text(i.arrival_date),
        proposed: |p| p.arrival_date.map(date_text),
    },
    TrackedField {
        name: "current_date",
        event_type: AuditEventType::FieldChange,
        prior: |i| date_text(i.current_date),
        proposed: |p| p.current_date.map(date_text),
    },
    TrackedField {
        name: "color",
        event_type: AuditEventType::FieldChange,
        prior: |i| i.color.clone(),
        proposed: |p| p.color.clone(),
    },
    TrackedField {
        name: "model_year",
        event_type: AuditEventType::FieldChange,
        prior: |i| i.model_year.clone(),
        proposed: |p| p.model_year.clone(),
    },
];

/// Names of the audited fields, in table order
pub fn tracked_field_names() -> Vec<&'static str> {
    TRACKED_FIELDS.iter().map(|f| f.name).collect()
}

// ==========================================
// AuditDiffEngine
// ==========================================
pub struct AuditDiffEngine {
    stock_store: Arc<dyn StockStore>,
}

impl AuditDiffEngine {
    pub fn new(stock_store: Arc<dyn StockStore>) -> Self {
        Self { stock_store }
    }

    /// Entries for every tracked field the proposal actually changes.
    ///
    /// null and absent compare as the empty string.
    pub fn diff(prior: &StockItem, patch: &StockItemPatch, actor: &Actor) -> Vec<NewAuditEntry> {
        TRACKED_FIELDS
            .iter()
            .filter_map(|field| {
                let proposed = (field.proposed)(patch)?;
                let old = (field.prior)(prior);
                if old.as_deref().unwrap_or("") == proposed.as_deref().unwrap_or("") {
                    return None;
                }
                Some(NewAuditEntry::field_change(
                    prior.id,
                    field.event_type,
                    field.name,
                    old,
                    proposed,
                    actor,
                ))
            })
            .collect()
    }

    /// Record the changes and write the whole proposal as one atomic store call;
    /// a failed write leaves neither entries nor changes behind.
    ///
    /// The snapshot read and the write are not atomic: a concurrent edit in
    /// between leaves an entry whose prior value is already stale.
    #[instrument(skip(self, patch, actor), fields(actor = %actor.name))]
    pub fn apply(&self, item_id: i64, patch: &StockItemPatch, actor: &Actor) -> EngineResult<StockItem> {
        let prior = self
            .stock_store
            .find_by_id(item_id)?
            .ok_or(EngineError::ItemNotFound(item_id))?;

        if patch.is_empty() {
            return Ok(prior);
        }

        let entries = Self::diff(&prior, patch, actor);
        debug!(entries = entries.len(), "audit entries computed");

        let updated = self.stock_store.update_audited(item_id, patch, &entries)?;
        info!(changes = entries.len(), "stock item updated");
        Ok(updated)
    }
}
