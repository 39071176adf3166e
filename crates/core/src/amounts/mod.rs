//! Amounts in default currency and general tax calculation.

pub mod calculator;
pub mod error;
pub mod types;

#[cfg(test)]
mod props;

pub use calculator::AmountsCalculator;
pub use error::AmountsError;
pub use types::{AmountsInDefaultCurrency, AmountsInput, CalculatedAmounts};
