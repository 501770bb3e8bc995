// ==========================================
// Stock Ledger - Stock API
// ==========================================
// Single-item operations: read, create, edit (audited), delete,
// listing, audit history, manual notes, critical-age alerts.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{
    Actor, AuditEntry, AuditEventType, NewAuditEntry, NewStockItem, Page, StockFilter,
    StockFilterValues, StockItem, StockItemPatch,
};
use crate::engine::AuditDiffEngine;
use crate::repository::{AuditStore, StockStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Acknowledgment of an edit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditAck {
    pub success: bool,
    pub item: StockItem,
}

pub struct StockApi {
    stock_store: Arc<dyn StockStore>,
    audit_store: Arc<dyn AuditStore>,
    diff_engine: AuditDiffEngine,
}

impl StockApi {
    pub fn new(stock_store: Arc<dyn StockStore>, audit_store: Arc<dyn AuditStore>) -> Self {
        let diff_engine = AuditDiffEngine::new(stock_store.clone());
        Self {
            stock_store,
            audit_store,
            diff_engine,
        }
    }

    pub fn get(&self, id: i64) -> ApiResult<StockItem> {
        self.stock_store
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("stock_item(id={})", id)))
    }

    /// Manual entry; the item and its CREATED entry are written together
    pub fn create(&self, item: &NewStockItem, actor: &Actor) -> ApiResult<StockItem> {
        let created = NewAuditEntry::event(0, AuditEventType::Created, None, actor);
        let id = self.stock_store.insert_audited(item, &created)?;
        info!(id, actor = %actor.name, "stock item created");
        self.get(id)
    }

    /// All-or-nothing edit of one item
    pub fn edit(&self, id: i64, patch: &StockItemPatch, actor: &Actor) -> ApiResult<EditAck> {
        let item = self.diff_engine.apply(id, patch, actor)?;
        Ok(EditAck {
            success: true,
            item,
        })
    }

    /// Physical delete; the audit trail goes with the item
    pub fn delete(&self, id: i64) -> ApiResult<()> {
        if !self.stock_store.delete(id)? {
            return Err(ApiError::NotFound(format!("stock_item(id={})", id)));
        }
        info!(id, "stock item deleted");
        Ok(())
    }

    pub fn list(&self, filter: &StockFilter) -> ApiResult<Page<StockItem>> {
        if filter.page_size == 0 {
            return Err(ApiError::InvalidInput("page_size must be positive".to_string()));
        }
        Ok(self.stock_store.list(filter)?)
    }

    /// Values offered by the listing's location, color, tire and code filters
    pub fn filter_values(&self) -> ApiResult<StockFilterValues> {
        Ok(self.stock_store.filter_values()?)
    }

    /// Audit trail, newest first
    pub fn history(&self, id: i64) -> ApiResult<Vec<AuditEntry>> {
        Ok(self.audit_store.list_for_item(id)?)
    }

    /// Free-text note on the trail (EDITED, no field)
    pub fn add_note(&self, id: i64, note: &str, actor: &Actor) -> ApiResult<i64> {
        let note = note.trim();
        if note.is_empty() {
            return Err(ApiError::InvalidInput("note must not be empty".to_string()));
        }
        self.get(id)?;
        let entry_id = self.audit_store.append(&NewAuditEntry::event(
            id,
            AuditEventType::Edited,
            Some(note.to_string()),
            actor,
        ))?;
        Ok(entry_id)
    }

    /// Free items past the critical age that were not notified yet
    pub fn critical(&self) -> ApiResult<Vec<StockItem>> {
        Ok(self.stock_store.find_critical()?)
    }

    pub fn mark_notified(&self, ids: &[i64]) -> ApiResult<usize> {
        Ok(self.stock_store.mark_notified(ids)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StockStatus;
    use crate::repository::{AuditEntryRepository, StockItemRepository};
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn api() -> StockApi {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        StockApi::new(
            Arc::new(StockItemRepository::new(conn.clone())),
            Arc::new(AuditEntryRepository::new(conn)),
        )
    }

    #[test]
    fn test_create_records_created_entry() {
        let api = api();
        let item = api
            .create(
                &NewStockItem {
                    sequence_no: Some(1),
                    ..Default::default()
                },
                &Actor::new(2, "Bruno"),
            )
            .unwrap();

        let history = api.history(item.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].event_type, AuditEventType::Created);
        assert_eq!(history[0].field, None);
    }

    #[test]
    fn test_failed_create_leaves_nothing_behind() {
        let api = api();
        let item = NewStockItem {
            sequence_no: Some(1),
            ..Default::default()
        };
        api.create(&item, &Actor::system()).unwrap();

        assert!(matches!(
            api.create(&item, &Actor::system()),
            Err(ApiError::InvalidInput(_))
        ));
        let page = api.list(&StockFilter::default()).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(api.history(page.data[0].id).unwrap().len(), 1);
    }

    #[test]
    fn test_edit_then_note_history_newest_first() {
        let api = api();
        let actor = Actor::system();
        let item = api.create(&NewStockItem::default(), &actor).unwrap();

        let ack = api
            .edit(
                item.id,
                &StockItemPatch {
                    status: Some(StockStatus::Sold),
                    ..Default::default()
                },
                &actor,
            )
            .unwrap();
        assert!(ack.success);
        assert_eq!(ack.item.status, StockStatus::Sold);

        api.add_note(item.id, "  cliente retirou  ", &actor).unwrap();

        let history = api.history(item.id).unwrap();
        let types: Vec<_> = history.iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![
                AuditEventType::Edited,
                AuditEventType::StatusChange,
                AuditEventType::Created
            ]
        );
        assert_eq!(history[0].note.as_deref(), Some("cliente retirou"));
    }

    #[test]
    fn test_edit_missing_item() {
        let err = api()
            .edit(5, &StockItemPatch::default(), &Actor::system())
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_empty_note_rejected() {
        let api = api();
        let item = api.create(&NewStockItem::default(), &Actor::system()).unwrap();
        assert!(matches!(
            api.add_note(item.id, "   ", &Actor::system()),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_delete_removes_item_and_history() {
        let api = api();
        let item = api.create(&NewStockItem::default(), &Actor::system()).unwrap();
        api.delete(item.id).unwrap();

        assert!(matches!(api.get(item.id), Err(ApiError::NotFound(_))));
        assert!(api.history(item.id).unwrap().is_empty());
        assert!(matches!(api.delete(item.id), Err(ApiError::NotFound(_))));
    }
}
