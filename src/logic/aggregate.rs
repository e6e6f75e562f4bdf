use rust_decimal::Decimal;

use crate::logic::amount::{format_amount, parse_amount};
use crate::logic::reconcile::SelectionSnapshot;
use crate::state::{CurrencyTable, ItemId};

/// Derived totals for the selection tray.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aggregate {
    /// Exact sum of valid amounts.
    pub total: Decimal,
    /// Currency of the first entry; `None` for an empty snapshot.
    pub currency: Option<String>,
    /// Entries whose amount is the placeholder, unparsable or zero.
    pub invalid_entries: Vec<ItemId>,
    /// Whether entries carry more than one currency code.
    pub mixed_currency: bool,
    /// Decimal places used for display.
    pub decimals: u32,
}

impl Aggregate {
    /// Total rounded and padded for display.
    pub fn formatted_total(&self) -> String {
        format_amount(self.total, self.decimals)
    }

    /// Whether every entry holds a payable amount.
    pub fn is_valid(&self) -> bool {
        self.invalid_entries.is_empty()
    }
}

/// What: Compute the cross-item total for a snapshot.
///
/// Inputs:
/// - `snapshot`: Selection snapshot.
/// - `currencies`: Decimal places per currency.
///
/// Output:
/// - Aggregate with exact total, currency and per-entry validity.
///
/// Details:
/// - Accumulation is exact; rounding happens only in [`Aggregate::formatted_total`].
/// - Invalid entries contribute zero to the total.
/// - The currency of the first entry labels the total even when others differ.
pub fn compute(snapshot: &SelectionSnapshot, currencies: &CurrencyTable) -> Aggregate {
    let currency = snapshot.entries().first().map(|e| e.currency_code.clone());
    let mut total = Decimal::ZERO;
    let mut invalid_entries = Vec::new();
    let mut mixed_currency = false;
    for entry in snapshot.entries() {
        if currency.as_deref() != Some(entry.currency_code.as_str()) {
            mixed_currency = true;
        }
        match parse_amount(&entry.editable_amount) {
            Some(v) if v > Decimal::ZERO => total += v,
            _ => invalid_entries.push(entry.id.clone()),
        }
    }
    let decimals = currency
        .as_deref()
        .map_or(currencies.default_decimals, |c| currencies.decimals_for(c));
    Aggregate {
        total,
        currency,
        invalid_entries,
        mixed_currency,
        decimals,
    }
}
