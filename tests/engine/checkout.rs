//! Checkout payload validation and select-all with disabled rows.

use invoice_tray::app::checkout::submit_checkout;
use invoice_tray::logic::{CheckoutLineItem, CheckoutPayload, SelectionSnapshot, SnapshotEntry, build};
use invoice_tray::sources::{CheckoutCollaborator, CheckoutRedirect, Result};
use invoice_tray::state::{
    EngineSettings, FilterSet, ItemId, MixedCurrencyPolicy, Page, PageResponse,
};
use invoice_tray::{ListEngine, ValidationError};

use futures::future::BoxFuture;

use super::common::{engine, invoice, invoice_in};

fn entry(id: u64, amount: &str) -> SnapshotEntry {
    SnapshotEntry {
        id: ItemId::Number(id),
        editable_amount: amount.to_string(),
        currency_code: "USD".to_string(),
    }
}

#[test]
/// What: Checkout validation examples
///
/// - Input: Placeholder-only snapshot; then 433 + 232 USD
/// - Output: Validation error; then two string line items
fn checkout_validation_examples() {
    let bad = SelectionSnapshot::from_entries(vec![entry(1, ".")]);
    assert!(build(&bad, MixedCurrencyPolicy::FirstWins).is_err());

    let good = SelectionSnapshot::from_entries(vec![entry(1, "433"), entry(2, "232")]);
    let payload = build(&good, MixedCurrencyPolicy::FirstWins).expect("valid");
    assert_eq!(
        payload,
        CheckoutPayload {
            line_items: vec![
                CheckoutLineItem { entity_id: 1, amount: "433".into(), currency: "USD".into() },
                CheckoutLineItem { entity_id: 2, amount: "232".into(), currency: "USD".into() },
            ],
            currency: "USD".into(),
        }
    );
}

#[test]
/// What: Select-all respects disabled rows
///
/// - Input: A enabled, B with zero balance on the visible page
/// - Output: Selection is {A}
fn select_all_respects_disabled() {
    let mut eng = engine();
    let req = eng.initial_request();
    eng.apply_response(PageResponse {
        tag: req.tag,
        result: Ok(Page { items: vec![invoice(1, 50), invoice(2, 0)], total_count: 2 }),
    })
    .expect("applied");
    eng.on_select_all_toggled(true);
    assert_eq!(eng.selected_ids(), vec![ItemId::Number(1)]);
}

#[test]
/// What: Mixed currencies are rejected when configured
fn mixed_currency_rejected_by_policy() {
    let settings = EngineSettings {
        mixed_currency: MixedCurrencyPolicy::Reject,
        ..Default::default()
    };
    let mut eng = ListEngine::new(settings, FilterSet::new());
    let req = eng.initial_request();
    eng.apply_response(PageResponse {
        tag: req.tag,
        result: Ok(Page {
            items: vec![invoice_in(1, 10, "USD"), invoice_in(2, 1000, "JPY")],
            total_count: 2,
        }),
    })
    .expect("applied");
    eng.on_row_toggled(&ItemId::Number(1));
    eng.on_row_toggled(&ItemId::Number(2));
    assert!(eng.aggregate().mixed_currency);
    assert_eq!(eng.selected_value().entries()[1].editable_amount, "1000");
    assert_eq!(
        eng.build_checkout(),
        Err(ValidationError::MixedCurrencies { first: "USD".into(), other: "JPY".into() })
    );
}

/// Collaborator that echoes the line count in the redirect.
struct EchoCheckout;

impl CheckoutCollaborator for EchoCheckout {
    fn submit(&self, payload: CheckoutPayload) -> BoxFuture<'_, Result<CheckoutRedirect>> {
        Box::pin(async move {
            Ok(CheckoutRedirect {
                redirect_url: format!("https://pay.example/?lines={}", payload.line_items.len()),
            })
        })
    }
}

#[tokio::test]
/// What: Edited amounts are what gets submitted
async fn submits_edited_amounts() {
    let mut eng = engine();
    let req = eng.initial_request();
    eng.apply_response(PageResponse {
        tag: req.tag,
        result: Ok(Page { items: vec![invoice(1, 500), invoice(2, 80)], total_count: 2 }),
    })
    .expect("applied");
    eng.on_row_toggled(&ItemId::Number(1));
    eng.on_row_toggled(&ItemId::Number(2));
    eng.on_field_edited(&ItemId::Number(1), "120.5");
    let payload = eng.build_checkout().expect("valid");
    assert_eq!(payload.line_items[0].amount, "120.5");
    assert_eq!(payload.line_items[1].amount, "80.00");
    let redirect = submit_checkout(&eng, &EchoCheckout).await.expect("submitted");
    assert_eq!(redirect.redirect_url, "https://pay.example/?lines=2");
}
