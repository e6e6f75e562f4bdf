use crate::error::ValidationError;
use rust_decimal::Decimal;

use crate::logic::amount::{format_amount, is_payable, parse_amount};
use crate::logic::reconcile::SelectionSnapshot;
use crate::state::{CurrencyTable, ListItem, MixedCurrencyPolicy};

/// One line of the checkout mutation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineItem {
    /// Invoice entity id.
    pub entity_id: u64,
    /// Amount as a decimal string.
    pub amount: String,
    /// Currency code.
    pub currency: String,
}

/// Payload handed to the checkout collaborator.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    /// One line per selected invoice.
    pub line_items: Vec<CheckoutLineItem>,
    /// Currency of the payment.
    pub currency: String,
}

/// What: Turn a selection snapshot into a checkout payload.
///
/// Inputs:
/// - `snapshot`: Selected entries with their amounts.
/// - `policy`: Mixed-currency handling.
///
/// Output:
/// - `Ok(payload)` with one line per entry, in snapshot order.
///
/// # Errors
/// - `EmptySelection` for an empty snapshot
/// - `InvalidAmount` for the first placeholder, unparsable or zero amount
/// - `NonNumericId` when an id has no numeric entity id
/// - `MixedCurrencies` when currencies differ and `policy` is `Reject`
///
/// Details:
/// - Amounts are re-rendered from the parsed `Decimal`: typed scale is kept,
///   stray points and leading zeros (`"12."`, `"007"`) are not.
/// - Nothing partial is returned: any failing entry rejects the whole payload.
pub fn build(
    snapshot: &SelectionSnapshot,
    policy: MixedCurrencyPolicy,
) -> Result<CheckoutPayload, ValidationError> {
    let Some(first) = snapshot.entries().first() else {
        return Err(ValidationError::EmptySelection);
    };
    let currency = first.currency_code.clone();
    let mut line_items = Vec::with_capacity(snapshot.len());
    for entry in snapshot.entries() {
        let Some(amount) = parse_amount(&entry.editable_amount).filter(|v| *v > Decimal::ZERO)
        else {
            return Err(ValidationError::InvalidAmount {
                id: entry.id.clone(),
            });
        };
        if policy == MixedCurrencyPolicy::Reject && entry.currency_code != currency {
            return Err(ValidationError::MixedCurrencies {
                first: currency,
                other: entry.currency_code.clone(),
            });
        }
        let Some(entity_id) = entry.id.as_entity_id() else {
            return Err(ValidationError::NonNumericId {
                id: entry.id.clone(),
            });
        };
        line_items.push(CheckoutLineItem {
            entity_id,
            amount: amount.to_string(),
            currency: currency.clone(),
        });
    }
    Ok(CheckoutPayload {
        line_items,
        currency,
    })
}

/// What: Build a one-line payload paying the full open balance of `item`.
///
/// # Errors
/// - `InvalidAmount` when the open balance is zero
/// - `NonNumericId` when the id has no numeric entity id
pub fn build_single<T: ListItem>(
    item: &T,
    currencies: &CurrencyTable,
) -> Result<CheckoutPayload, ValidationError> {
    let balance = item.open_balance();
    let amount = format_amount(balance.value, currencies.decimals_for(&balance.code));
    if !is_payable(&amount) {
        return Err(ValidationError::InvalidAmount {
            id: item.id().clone(),
        });
    }
    let Some(entity_id) = item.id().as_entity_id() else {
        return Err(ValidationError::NonNumericId {
            id: item.id().clone(),
        });
    };
    Ok(CheckoutPayload {
        line_items: vec![CheckoutLineItem {
            entity_id,
            amount,
            currency: balance.code.clone(),
        }],
        currency: balance.code.clone(),
    })
}
