use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::RegimeRulesError;

/// Errors surfaced by the tax engine and its input types.
///
/// Every variant describes input that was rejected; the engine never panics
/// on amounts it accepted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxEngineError {
    /// An income or deduction amount was negative.
    #[error("{category} amount for '{key}' must be non-negative, got {amount}")]
    InvalidAmount {
        category: &'static str,
        key: String,
        amount: Decimal,
    },

    /// A floating-point amount was NaN, infinite or outside the decimal range.
    #[error("{category} amount for '{key}' is not a finite number")]
    NonFiniteAmount { category: &'static str, key: String },

    /// Summing or scaling amounts left the range `Decimal` can represent.
    #[error("{category} exceeds the representable amount range")]
    AmountOverflow { category: &'static str },

    /// The age group tag is not one of `below_60`, `senior`, `super_senior`.
    #[error("unknown age group '{0}' (expected below_60, senior or super_senior)")]
    UnknownAgeGroup(String),

    /// The regime rules failed validation.
    #[error("invalid regime rules: {0}")]
    InvalidRules(#[from] RegimeRulesError),
}
