//! Selection across pages.

use invoice_tray::app::workers::fetch_and_apply;
use invoice_tray::state::{CheckState, EngineSettings, FilterSet, ItemId, SelectAllScope, SortDirection};
use invoice_tray::ListEngine;

use super::common::{PricedSource, engine};

#[tokio::test]
/// What: Selection survives pagination
///
/// - Input: Select invoice 1 on page 1, go to page 2 and back
/// - Output: Invoice 1 still selected and its snapshot entry intact
async fn selection_survives_pagination() {
    let source = PricedSource::with_invoices(25);
    let mut eng = engine();
    let req = eng.initial_request();
    fetch_and_apply(&mut eng, &source, req).await.expect("page 1");
    assert!(eng.on_row_toggled(&ItemId::Number(1)));

    let req = eng.on_page_changed(10, 10);
    assert!(req.keep_checked_items);
    fetch_and_apply(&mut eng, &source, req).await.expect("page 2");
    assert!(eng.is_selected(&ItemId::Number(1)));
    assert_eq!(eng.list().first().map(|i| i.id.clone()), Some(ItemId::Number(11)));
    assert_eq!(eng.header_check_state(), CheckState::Unchecked);

    let req = eng.on_page_changed(0, 10);
    fetch_and_apply(&mut eng, &source, req).await.expect("page 1 again");
    assert!(eng.is_selected(&ItemId::Number(1)));
    assert_eq!(eng.selected_value().len(), 1);
    assert_eq!(eng.header_check_state(), CheckState::Partial);
    assert_eq!(eng.cache_list().len(), 20);
}

#[tokio::test]
/// What: Sorting keeps cache context and selection
async fn sort_keeps_selection() {
    let source = PricedSource::with_invoices(5);
    let mut eng = engine();
    let req = eng.initial_request();
    fetch_and_apply(&mut eng, &source, req).await.expect("load");
    eng.on_row_toggled(&ItemId::Number(2));
    let ctx = eng.context();
    let req = eng.on_sort_changed("dueDate", SortDirection::Asc);
    assert_eq!(req.query.sort_key.as_deref(), Some("dueDate"));
    fetch_and_apply(&mut eng, &source, req).await.expect("sorted");
    assert_eq!(eng.context(), ctx);
    assert_eq!(eng.selected_ids(), vec![ItemId::Number(2)]);
}

#[tokio::test]
/// What: Select-all across pages when configured for loaded rows
///
/// - Input: Two pages loaded, scope = loaded
/// - Output: All twenty loaded rows selected; aggregate sums both pages
async fn select_all_across_loaded_pages() {
    let source = PricedSource::with_invoices(25);
    let settings = EngineSettings {
        select_all_scope: SelectAllScope::Loaded,
        ..Default::default()
    };
    let mut eng = ListEngine::new(settings, FilterSet::new());
    let req = eng.initial_request();
    fetch_and_apply(&mut eng, &source, req).await.expect("page 1");
    let req = eng.on_page_changed(10, 10);
    fetch_and_apply(&mut eng, &source, req).await.expect("page 2");

    assert_eq!(eng.on_select_all_toggled(true), 20);
    assert_eq!(eng.selected_value().len(), 20);
    // 100 + 200 + ... + 2000
    assert_eq!(eng.aggregate().formatted_total(), "21000.00");
    assert_eq!(eng.header_check_state(), CheckState::Checked);

    assert_eq!(eng.on_select_all_toggled(false), 20);
    assert!(eng.selected_value().is_empty());
}

#[tokio::test]
/// What: Default select-all only affects the visible page
async fn select_all_page_scope() {
    let source = PricedSource::with_invoices(25);
    let mut eng = engine();
    let req = eng.initial_request();
    fetch_and_apply(&mut eng, &source, req).await.expect("page 1");
    let req = eng.on_page_changed(10, 10);
    fetch_and_apply(&mut eng, &source, req).await.expect("page 2");
    assert_eq!(eng.on_select_all_toggled(true), 10);
    assert!(eng.is_selected(&ItemId::Number(11)));
    assert!(!eng.is_selected(&ItemId::Number(1)));
}
