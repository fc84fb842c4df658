//! Request journal loading, filtering and clearing

mod common;

use common::{journal_entry, Call, FakeApi, Op};
use serde_json::json;
use wm_admin_tui::identity::event_key;
use wm_admin_tui::log_view::LogView;
use wm_admin_tui::workflow::{DispatchOp, WorkflowError};

fn journal() -> FakeApi {
    FakeApi::new().with_requests(vec![
        journal_entry("e-1", "GET", "/orders?id=7", Some("m-1")),
        journal_entry("e-2", "POST", "/users", None),
        // Proxy-style entry without an id
        json!({
            "request": {"method": "DELETE", "url": "/orders/7", "timestamp": "1700000000500"},
            "response": {"status": 204}
        }),
    ])
}

#[tokio::test]
async fn test_load_and_filter() {
    let fake = journal();
    let mut view = LogView::new();
    assert_eq!(view.load(&fake).await.unwrap(), 3);

    view.query = "ORDERS".to_string();
    let methods: Vec<_> = view
        .visible()
        .iter()
        .map(|e| e.request.method.clone().unwrap_or_default())
        .collect();
    assert_eq!(methods, vec!["GET", "DELETE"]);

    view.query = "  ".to_string();
    assert_eq!(view.visible().len(), 3);
}

#[tokio::test]
async fn test_selection_survives_reload() {
    let fake = journal();
    let mut view = LogView::new();
    view.load(&fake).await.unwrap();

    let key = event_key(&view.entries()[2]);
    assert_eq!(key, "DELETE|/orders/7|1700000000500");
    view.select(Some(key.clone()));

    view.load(&fake).await.unwrap();
    assert_eq!(view.selected_key(), Some(key.as_str()));
    assert_eq!(view.selected_visible_index(), Some(2));

    view.query = "users".to_string();
    assert_eq!(view.selected_visible_index(), None);
    assert!(view.selected().is_some());
}

#[tokio::test]
async fn test_clear_journal_reloads() {
    let fake = journal();
    let mut view = LogView::new();
    view.load(&fake).await.unwrap();
    view.select(Some("e-1".to_string()));
    fake.clear_calls();

    view.clear_journal(&fake).await.unwrap();

    assert_eq!(fake.calls(), vec![Call::ResetRequests, Call::ListRequests]);
    assert!(view.entries().is_empty());
    assert_eq!(view.selected_key(), None);
}

#[tokio::test]
async fn test_rejected_clear_keeps_entries() {
    let fake = journal();
    let mut view = LogView::new();
    view.load(&fake).await.unwrap();
    fake.fail(Op::ResetRequests, 403);

    let err = view.clear_journal(&fake).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Dispatch {
            op: DispatchOp::ClearJournal,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Clear journal failed: HTTP 403");
    assert_eq!(view.entries().len(), 3);
}

#[tokio::test]
async fn test_failed_load_keeps_entries() {
    let fake = journal();
    let mut view = LogView::new();
    view.load(&fake).await.unwrap();

    fake.fail(Op::ListRequests, 500);
    assert!(matches!(
        view.load(&fake).await,
        Err(WorkflowError::Transport(_))
    ));
    assert_eq!(view.entries().len(), 3);
}
