// ==========================================
// Stock Ledger - Audit Trail Domain Model
// ==========================================
// Field-level, append-only change history of a stock item.
// Displayed newest first.
// ==========================================

use crate::domain::types::AuditEventType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// AuditEntry - persisted change record (immutable)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub item_id: i64,
    pub event_type: AuditEventType,
    pub field: Option<String>,     // only for the *_CHANGE categories
    pub old_value: Option<String>, // stringified prior value
    pub new_value: Option<String>, // stringified new value
    pub actor_name: String,
    pub actor_id: i64,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

// ==========================================
// NewAuditEntry - entry waiting to be appended
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub item_id: i64,
    pub event_type: AuditEventType,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub actor_name: String,
    pub actor_id: i64,
    pub note: Option<String>,
}

// ==========================================
// Actor - user on whose behalf a change is made
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
}

impl Actor {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Used when the calling layer has no authenticated user
    pub fn system() -> Self {
        Self::new(0, "Sistema")
    }
}

impl NewAuditEntry {
    /// Entry describing a single field transition
    pub fn field_change(
        item_id: i64,
        event_type: AuditEventType,
        field: &str,
        old_value: Option<String>,
        new_value: Option<String>,
        actor: &Actor,
    ) -> Self {
        Self {
            item_id,
            event_type,
            field: Some(field.to_string()),
            old_value,
            new_value,
            actor_name: actor.name.clone(),
            actor_id: actor.id,
            note: None,
        }
    }

    /// Entry without a field (CREATED / EDITED)
    pub fn event(item_id: i64, event_type: AuditEventType, note: Option<String>, actor: &Actor) -> Self {
        Self {
            item_id,
            event_type,
            field: None,
            old_value: None,
            new_value: None,
            actor_name: actor.name.clone(),
            actor_id: actor.id,
            note,
        }
    }

    pub fn into_entry(self, id: i64, created_at: NaiveDateTime) -> AuditEntry {
        AuditEntry {
            id,
            item_id: self.item_id,
            event_type: self.event_type,
            field: self.field,
            old_value: self.old_value,
            new_value: self.new_value,
            actor_name: self.actor_name,
            actor_id: self.actor_id,
            note: self.note,
            created_at,
        }
    }
}
