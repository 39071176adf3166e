//! Amount calculation error types.

use thiserror::Error;

/// Errors raised while validating or calculating amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountsError {
    /// An amount is negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount {
        /// Name of the offending field.
        field: &'static str,
        /// Provided value.
        value: i64,
    },

    /// Business-use percentage outside 0..=100.
    #[error("percentOnBusiness must be between 0 and 100, got {0}")]
    InvalidPercentOnBusiness(i32),

    /// Tax rate outside 0..=10000 basis points.
    #[error("Tax rate must be between 0 and 10000 bps, got {0}")]
    InvalidTaxRate(i32),

    /// Result does not fit into minor units.
    #[error("Amount overflow")]
    Overflow,
}
