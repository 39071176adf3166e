//! Amount types shared by expenses and incomes.

use serde::{Deserialize, Serialize};
use tally_shared::types::{CurrencyCode, MinorUnits};

use crate::status::AmountsStatus;

/// Amount of a record expressed in the workspace default currency.
///
/// Both values absent means the record is not converted yet. The adjusted
/// amount is only ever derived from the original one, so `adjusted.is_some()`
/// implies `original.is_some()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountsInDefaultCurrency {
    /// Amount as converted from the record currency, tax and business share included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_amount_in_default_currency: Option<MinorUnits>,
    /// Business share of the original amount with general tax excluded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_amount_in_default_currency: Option<MinorUnits>,
}

impl AmountsInDefaultCurrency {
    /// Amounts of a record that is not converted yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            original_amount_in_default_currency: None,
            adjusted_amount_in_default_currency: None,
        }
    }

    /// Returns true when the adjusted amount is known.
    #[must_use]
    pub const fn is_adjusted(&self) -> bool {
        self.adjusted_amount_in_default_currency.is_some()
    }
}

/// Raw amounts of an expense or income as entered by the user.
#[derive(Debug, Clone)]
pub struct AmountsInput {
    /// Amount in the record currency.
    pub original_amount: MinorUnits,
    /// Record currency.
    pub currency: CurrencyCode,
    /// Workspace default currency.
    pub default_currency: CurrencyCode,
    /// Converted amount, once the exchange rate is known.
    pub converted_amount_in_default_currency: Option<MinorUnits>,
    /// Whether tax reporting uses its own exchange rate.
    pub use_different_exchange_rate_for_income_tax_purposes: bool,
    /// Converted amount at the tax reporting rate.
    pub income_taxable_amount_in_default_currency: Option<MinorUnits>,
    /// Business share in percent; always 100 for incomes.
    pub percent_on_business: i32,
    /// Rate of the attached general tax.
    pub general_tax_rate_in_bps: Option<i32>,
}

/// Derived amounts and status of an expense or income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculatedAmounts {
    /// Amounts at the bookkeeping exchange rate.
    pub converted_amounts: AmountsInDefaultCurrency,
    /// Amounts at the tax reporting exchange rate.
    pub income_taxable_amounts: AmountsInDefaultCurrency,
    /// Effective flag; always false for records in the default currency.
    pub use_different_exchange_rate_for_income_tax_purposes: bool,
    /// General tax included in the income taxable amount.
    pub general_tax_amount: Option<MinorUnits>,
    /// Derived lifecycle status.
    pub status: AmountsStatus,
}
