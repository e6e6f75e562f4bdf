//! Error types surfaced by the engine.
//!
//! Only checkout validation and remote failures leave the engine as errors.
//! Stale responses and unresolved selections are handled locally.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::sources::BoxError;
use crate::state::ItemId;

/// Reasons a row is refused at the page cache boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemRejection {
    /// Balance carries no currency code.
    #[error("item {id} has no currency code")]
    MissingCurrency {
        /// Offending row.
        id: ItemId,
    },
    /// Open balance below zero.
    #[error("item {id} has negative open balance {value}")]
    NegativeBalance {
        /// Offending row.
        id: ItemId,
        /// Reported balance.
        value: Decimal,
    },
}

/// Checkout payload validation failure; one actionable message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing is selected.
    #[error("select at least one invoice to pay")]
    EmptySelection,
    /// An amount is empty, the placeholder, unparsable, or zero.
    #[error("payment amount for invoice {id} must be greater than zero")]
    InvalidAmount {
        /// First offending entry.
        id: ItemId,
    },
    /// Entries in different currencies while mixing is rejected.
    #[error("selected invoices use different currencies ({first} and {other})")]
    MixedCurrencies {
        /// Currency of the first entry.
        first: String,
        /// First differing currency.
        other: String,
    },
    /// The id cannot be expressed as a numeric entity id.
    #[error("invoice {id} has no numeric entity id")]
    NonNumericId {
        /// Offending entry.
        id: ItemId,
    },
    /// The id is not loaded in the current filter context.
    #[error("invoice {id} is not loaded")]
    UnknownItem {
        /// Requested id.
        id: ItemId,
    },
}

/// Errors returned by engine operations that cross the async boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Payload validation failed; no state was changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The list source or checkout collaborator failed.
    #[error("remote collaborator failed: {0}")]
    Remote(#[source] BoxError),
}

impl EngineError {
    /// Borrow the validation error, if that is what this is.
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(v) => Some(v),
            Self::Remote(_) => None,
        }
    }
}
