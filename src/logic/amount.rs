//! Decimal helpers for user-editable payment amounts.
//!
//! Amounts travel as strings between the input field, the selection snapshot
//! and the checkout payload; arithmetic only ever happens on `Decimal`.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Text a numeric input holds when the user typed only a decimal point.
pub const PLACEHOLDER_AMOUNT: &str = ".";

/// Whether `raw` is empty or the bare decimal-point placeholder.
pub fn is_placeholder(raw: &str) -> bool {
    let t = raw.trim();
    t.is_empty() || t == PLACEHOLDER_AMOUNT
}

/// What: Parse an editable amount.
///
/// Output:
/// - `Some(value)` for non-negative decimals; `None` for placeholders, junk
///   and negative numbers.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    if is_placeholder(raw) {
        return None;
    }
    let value = Decimal::from_str(raw.trim()).ok()?;
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    Some(value)
}

/// What: Whether `raw` is an amount that may be submitted for payment.
pub fn is_payable(raw: &str) -> bool {
    parse_amount(raw).is_some_and(|v| v > Decimal::ZERO)
}

/// What: Round half away from zero to `decimals` places and render with exactly
/// that many fractional digits.
pub fn format_amount(value: Decimal, decimals: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    rounded.to_string()
}

/// What: Filter typed text down to a well-formed partial amount.
///
/// Inputs:
/// - `raw`: Text as typed.
/// - `decimals`: Decimal places allowed by the currency.
///
/// Output:
/// - Digits with at most one decimal point and at most `decimals` fractional digits.
///
/// Details:
/// - Characters other than ASCII digits and `.` are dropped (group separators, signs).
/// - With zero decimal places the point and everything after it are removed.
/// - A bare `"."` is kept so the field can show what the user typed.
pub fn sanitize_amount_input(raw: &str, decimals: u32) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut seen_point = false;
    let mut fraction = 0u32;
    for c in raw.trim().chars() {
        if c.is_ascii_digit() {
            if seen_point {
                if fraction >= decimals {
                    continue;
                }
                fraction += 1;
            }
            out.push(c);
        } else if c == '.' && !seen_point {
            seen_point = true;
            if decimals == 0 {
                break;
            }
            out.push(c);
        }
    }
    out
}
