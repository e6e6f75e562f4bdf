//! Edit preservation across refreshes and re-selection.

use invoice_tray::app::workers::fetch_and_apply;
use invoice_tray::state::{ItemId, RefreshOptions};

use super::common::{PricedSource, amount_of, engine};

#[tokio::test]
/// What: Edit survives a keep-checked refresh that changes the server default
///
/// - Input: Invoice 1 defaults to 100, edited to 42, server balance becomes 150
/// - Output: Snapshot still shows 42
async fn edit_survives_refresh() {
    let source = PricedSource::with_invoices(3);
    let mut eng = engine();
    let req = eng.initial_request();
    fetch_and_apply(&mut eng, &source, req).await.expect("load");

    eng.on_row_toggled(&ItemId::Number(1));
    assert_eq!(amount_of(&eng, 1).as_deref(), Some("100.00"));
    eng.on_field_edited(&ItemId::Number(1), "42");

    source.set_balance(1, 150);
    let req = eng.on_refresh(RefreshOptions { keep_checked_items: true });
    fetch_and_apply(&mut eng, &source, req).await.expect("refresh");

    assert_eq!(amount_of(&eng, 1).as_deref(), Some("42"));
    assert_eq!(eng.aggregate().formatted_total(), "42.00");
}

#[tokio::test]
/// What: Re-selection resets the edit to the (updated) server default
async fn reselection_resets_edit() {
    let source = PricedSource::with_invoices(3);
    let mut eng = engine();
    let req = eng.initial_request();
    fetch_and_apply(&mut eng, &source, req).await.expect("load");

    let a = ItemId::Number(1);
    eng.on_row_toggled(&a);
    eng.on_field_edited(&a, "42");
    eng.on_row_toggled(&a);
    assert_eq!(amount_of(&eng, 1), None);

    source.set_balance(1, 150);
    let req = eng.on_refresh(RefreshOptions::default());
    fetch_and_apply(&mut eng, &source, req).await.expect("refresh");
    eng.on_row_toggled(&a);
    assert_eq!(amount_of(&eng, 1).as_deref(), Some("150.00"));
}

#[tokio::test]
/// What: Snapshot order follows selection order, not list order
async fn snapshot_order_is_selection_order() {
    let source = PricedSource::with_invoices(5);
    let mut eng = engine();
    let req = eng.initial_request();
    fetch_and_apply(&mut eng, &source, req).await.expect("load");
    for id in [4, 2, 5] {
        eng.on_row_toggled(&ItemId::Number(id));
    }
    let order: Vec<_> = eng.selected_value().entries().iter().map(|e| e.id.clone()).collect();
    assert_eq!(order, vec![ItemId::Number(4), ItemId::Number(2), ItemId::Number(5)]);
}

#[tokio::test]
/// What: Aggregate is idempotent and reflects edits
async fn aggregate_idempotent() {
    let source = PricedSource::with_invoices(3);
    let mut eng = engine();
    let req = eng.initial_request();
    fetch_and_apply(&mut eng, &source, req).await.expect("load");
    eng.on_row_toggled(&ItemId::Number(1));
    eng.on_row_toggled(&ItemId::Number(2));
    eng.on_field_edited(&ItemId::Number(2), "12.345");
    let first = eng.aggregate();
    let second = eng.aggregate();
    assert_eq!(first, second);
    assert_eq!(first.formatted_total(), "112.34");
    assert_eq!(first.currency.as_deref(), Some("USD"));
}

#[tokio::test]
/// What: Edits on rows whose balance drops to zero leave the snapshot
async fn paid_row_leaves_snapshot_but_stays_selected() {
    let source = PricedSource::with_invoices(2);
    let mut eng = engine();
    let req = eng.initial_request();
    fetch_and_apply(&mut eng, &source, req).await.expect("load");
    eng.on_row_toggled(&ItemId::Number(2));
    source.set_balance(2, 0);
    let req = eng.on_refresh(RefreshOptions::default());
    fetch_and_apply(&mut eng, &source, req).await.expect("refresh");
    assert!(eng.is_selected(&ItemId::Number(2)));
    assert!(eng.selected_value().is_empty());
}

#[tokio::test]
/// What: A selected row refreshed into an invalid state stops contributing
///
/// - Input: Invoice 1 selected at 100, server then reports a negative balance
/// - Output: Still selected, out of the cache, snapshot and single payment
async fn invalid_refresh_drops_outdated_row() {
    let source = PricedSource::with_invoices(2);
    let mut eng = engine();
    let req = eng.initial_request();
    fetch_and_apply(&mut eng, &source, req).await.expect("load");
    eng.on_row_toggled(&ItemId::Number(1));
    eng.on_row_toggled(&ItemId::Number(2));
    assert_eq!(eng.aggregate().formatted_total(), "300.00");

    source.set_balance(1, -5);
    let req = eng.on_refresh(RefreshOptions::default());
    fetch_and_apply(&mut eng, &source, req).await.expect("refresh");

    assert!(eng.is_selected(&ItemId::Number(1)));
    assert!(amount_of(&eng, 1).is_none());
    assert_eq!(eng.aggregate().formatted_total(), "200.00");
    assert!(eng.build_single_checkout(&ItemId::Number(1)).is_err());
    assert_eq!(eng.list().len(), 1);
}
