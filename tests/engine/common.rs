//! Shared fixtures for engine integration tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use futures::future::BoxFuture;
use invoice_tray::sources::{PagedListSource, Result};
use invoice_tray::state::{
    EngineSettings, FilterPatch, FilterSet, InvoiceItem, InvoiceStatus, ItemId, Money, Page,
    PageQuery,
};
use invoice_tray::ListEngine;
use rust_decimal::Decimal;

/// What: Open invoice in `code` with the given balance.
pub fn invoice_in(id: u64, balance: i64, code: &str) -> InvoiceItem {
    InvoiceItem {
        id: ItemId::Number(id),
        invoice_number: format!("INV-{id}"),
        company_id: Some(7),
        status: InvoiceStatus::Open,
        open_balance: Money::new(code, Decimal::new(balance, 0)),
        original_balance: Money::new(code, Decimal::new(balance, 0)),
        due_date: Some("2026-11-01".to_string()),
        disable_current_checkbox: false,
    }
}

/// What: Open USD invoice.
pub fn invoice(id: u64, balance: i64) -> InvoiceItem {
    invoice_in(id, balance, "USD")
}

/// What: Single-key filter patch.
pub fn patch(key: &str, value: &str) -> FilterPatch {
    FilterPatch::from([(key.to_string(), Some(value.to_string()))])
}

/// In-memory invoice list whose balances can change between fetches.
///
/// Rows are ordered by id; a `status` filter other than `all` keeps only rows
/// whose id parity matches (`odd`/`even`).
#[derive(Debug, Default)]
pub struct PricedSource {
    /// Balance per invoice id.
    balances: Mutex<BTreeMap<u64, i64>>,
}

impl PricedSource {
    /// Source holding invoices `1..=count` with balance `id * 100`.
    pub fn with_invoices(count: u64) -> Self {
        let balances = (1..=count).map(|id| (id, (id * 100) as i64)).collect();
        Self {
            balances: Mutex::new(balances),
        }
    }

    /// Change the server-side balance of one invoice.
    pub fn set_balance(&self, id: u64, balance: i64) {
        if let Ok(mut b) = self.balances.lock() {
            b.insert(id, balance);
        }
    }

    /// Rows matching `filters`, in id order.
    fn rows(&self, filters: &FilterSet) -> Vec<InvoiceItem> {
        let parity = filters.get("status").map(String::as_str);
        let balances = self.balances.lock().map(|b| b.clone()).unwrap_or_default();
        balances
            .into_iter()
            .filter(|(id, _)| match parity {
                Some("odd") => id % 2 == 1,
                Some("even") => id % 2 == 0,
                _ => true,
            })
            .map(|(id, bal)| invoice(id, bal))
            .collect()
    }
}

impl PagedListSource for PricedSource {
    type Item = InvoiceItem;

    fn fetch_page(&self, query: PageQuery) -> BoxFuture<'_, Result<Page<InvoiceItem>>> {
        Box::pin(async move {
            let rows = self.rows(&query.filters);
            let total_count = rows.len();
            let items = rows
                .into_iter()
                .skip(query.offset)
                .take(query.limit)
                .collect();
            Ok(Page { items, total_count })
        })
    }
}

/// What: Engine with default settings and no filters.
pub fn engine() -> ListEngine<InvoiceItem> {
    ListEngine::new(EngineSettings::default(), FilterSet::new())
}

/// What: Amount shown in the snapshot for `id`.
pub fn amount_of(engine: &ListEngine<InvoiceItem>, id: u64) -> Option<String> {
    engine
        .selected_value()
        .get(&ItemId::Number(id))
        .map(|e| e.editable_amount.clone())
}
