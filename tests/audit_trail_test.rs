// ==========================================
// Audit trail integration tests
// ==========================================

mod test_helpers;

use stock_ledger::api::{ApiError, CommitRequest};
use stock_ledger::domain::{
    Actor, AuditEventType, ImportMode, NewStockItem, StockFilter, StockItemPatch, StockStatus,
};
use test_helpers::*;

fn imported_item_id(state: &stock_ledger::app::AppState) -> i64 {
    let wb = workbook(vec![stock_sheet(vec![stock_row(
        Some(1.0),
        "NF100",
        "LIVRE",
        200.0,
        "",
    )])]);
    let preview = state.import_api.preview_workbook(&wb).unwrap();
    state
        .import_api
        .commit(&CommitRequest {
            stock_items: preview.stock_items,
            schedule_items: Vec::new(),
            mode: ImportMode::Add,
        })
        .unwrap();
    state.stock_api.list(&StockFilter::default()).unwrap().data[0].id
}

#[test]
fn test_status_and_customer_edit_yields_two_entries() {
    let (_file, state) = create_test_state();
    let id = imported_item_id(&state);
    let actor = Actor::new(11, "Carla");

    let patch: StockItemPatch =
        serde_json::from_str(r#"{"status": "RESERVADO", "customer": "ACME"}"#).unwrap();
    let ack = state.stock_api.edit(id, &patch, &actor).unwrap();
    assert!(ack.success);

    let history = state.stock_api.history(id).unwrap();
    assert_eq!(history.len(), 2);

    let status = history
        .iter()
        .find(|e| e.event_type == AuditEventType::StatusChange)
        .unwrap();
    assert_eq!(status.field.as_deref(), Some("status"));
    assert_eq!(status.old_value.as_deref(), Some("LIVRE"));
    assert_eq!(status.new_value.as_deref(), Some("RESERVADO"));
    assert_eq!(status.actor_name, "Carla");
    assert_eq!(status.actor_id, 11);

    let customer = history
        .iter()
        .find(|e| e.event_type == AuditEventType::CustomerChange)
        .unwrap();
    assert_eq!(customer.old_value, None);
    assert_eq!(customer.new_value.as_deref(), Some("ACME"));

    let stored = state.stock_api.get(id).unwrap();
    assert_eq!(stored.status, StockStatus::Reserved);
    assert_eq!(stored.customer.as_deref(), Some("ACME"));
}

#[test]
fn test_unchanged_proposal_leaves_no_trail() {
    let (_file, state) = create_test_state();
    let id = imported_item_id(&state);
    let item = state.stock_api.get(id).unwrap();

    let patch = StockItemPatch {
        status: Some(item.status),
        days_in_stock: Some(item.days_in_stock),
        physical_location: Some(item.physical_location.clone()),
        customer: Some(None),
        ..Default::default()
    };
    state.stock_api.edit(id, &patch, &Actor::system()).unwrap();
    assert!(state.stock_api.history(id).unwrap().is_empty());
}

#[test]
fn test_history_is_newest_first() {
    let (_file, state) = create_test_state();
    let actor = Actor::system();
    let item = state
        .stock_api
        .create(&NewStockItem::default(), &actor)
        .unwrap();

    state
        .stock_api
        .edit(
            item.id,
            &StockItemPatch {
                physical_location: Some(Some("YARD-B".to_string())),
                ..Default::default()
            },
            &actor,
        )
        .unwrap();
    state.stock_api.add_note(item.id, "conferido", &actor).unwrap();

    let types: Vec<_> = state
        .stock_api
        .history(item.id)
        .unwrap()
        .iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(
        types,
        vec![
            AuditEventType::Edited,
            AuditEventType::LocationChange,
            AuditEventType::Created,
        ]
    );
}

#[test]
fn test_edit_unknown_item_fails_without_trail() {
    let (_file, state) = create_test_state();
    let err = state
        .stock_api
        .edit(404, &StockItemPatch::default(), &Actor::system())
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(state.stock_api.history(404).unwrap().is_empty());
}

#[test]
fn test_critical_items_and_notification_flag() {
    let (_file, state) = create_test_state();
    let id = imported_item_id(&state);

    let critical = state.stock_api.critical().unwrap();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].id, id);

    assert_eq!(state.stock_api.mark_notified(&[id]).unwrap(), 1);
    assert!(state.stock_api.critical().unwrap().is_empty());
    assert!(state.stock_api.get(id).unwrap().notified);
}

#[test]
fn test_failed_edit_leaves_history_and_item_unchanged() {
    let (_file, state) = create_test_state();
    let actor = Actor::system();
    let first = state
        .stock_api
        .create(
            &NewStockItem {
                sequence_no: Some(1),
                ..Default::default()
            },
            &actor,
        )
        .unwrap();
    state
        .stock_api
        .create(
            &NewStockItem {
                sequence_no: Some(2),
                ..Default::default()
            },
            &actor,
        )
        .unwrap();
    let before = state.stock_api.history(first.id).unwrap();

    let patch: StockItemPatch =
        serde_json::from_str(r#"{"status": "RESERVADO", "sequence_no": 2}"#).unwrap();
    let err = state.stock_api.edit(first.id, &patch, &actor).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let after = state.stock_api.history(first.id).unwrap();
    assert_eq!(after.len(), before.len());
    assert!(after
        .iter()
        .all(|e| e.event_type != AuditEventType::StatusChange));

    let stored = state.stock_api.get(first.id).unwrap();
    assert_eq!(stored.status, StockStatus::Free);
    assert_eq!(stored.sequence_no, Some(1));
}
