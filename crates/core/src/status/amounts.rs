//! Status of expenses and incomes.

use serde::{Deserialize, Serialize};

use crate::amounts::AmountsInDefaultCurrency;

/// Conversion status shared by expenses and incomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AmountsStatus {
    /// Converted amount is not known yet.
    PendingConversion,
    /// Converted, but the amount at the tax reporting rate is missing.
    PendingConversionForTaxationPurposes,
    /// All amounts are known.
    Finalized,
}

impl AmountsStatus {
    /// Derives the status from the calculated amounts.
    #[must_use]
    pub const fn derive(
        converted_amounts: &AmountsInDefaultCurrency,
        income_taxable_amounts: &AmountsInDefaultCurrency,
        use_different_exchange_rate_for_income_tax_purposes: bool,
    ) -> Self {
        if !converted_amounts.is_adjusted() {
            Self::PendingConversion
        } else if use_different_exchange_rate_for_income_tax_purposes
            && !income_taxable_amounts.is_adjusted()
        {
            Self::PendingConversionForTaxationPurposes
        } else {
            Self::Finalized
        }
    }

    /// Returns true for either pending status.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        !matches!(self, Self::Finalized)
    }

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingConversion => "PENDING_CONVERSION",
            Self::PendingConversionForTaxationPurposes => {
                "PENDING_CONVERSION_FOR_TAXATION_PURPOSES"
            }
            Self::Finalized => "FINALIZED",
        }
    }
}

impl std::fmt::Display for AmountsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EMPTY: AmountsInDefaultCurrency = AmountsInDefaultCurrency::empty();
    const CONVERTED: AmountsInDefaultCurrency = AmountsInDefaultCurrency {
        original_amount_in_default_currency: Some(100),
        adjusted_amount_in_default_currency: Some(90),
    };

    #[rstest]
    #[case(EMPTY, EMPTY, false, AmountsStatus::PendingConversion)]
    #[case(EMPTY, CONVERTED, true, AmountsStatus::PendingConversion)]
    #[case(EMPTY, CONVERTED, false, AmountsStatus::PendingConversion)]
    #[case(CONVERTED, EMPTY, true, AmountsStatus::PendingConversionForTaxationPurposes)]
    #[case(CONVERTED, CONVERTED, true, AmountsStatus::Finalized)]
    #[case(CONVERTED, CONVERTED, false, AmountsStatus::Finalized)]
    #[case(CONVERTED, EMPTY, false, AmountsStatus::Finalized)]
    fn test_derive_status(
        #[case] converted: AmountsInDefaultCurrency,
        #[case] taxable: AmountsInDefaultCurrency,
        #[case] use_different_rate: bool,
        #[case] expected: AmountsStatus,
    ) {
        assert_eq!(
            AmountsStatus::derive(&converted, &taxable, use_different_rate),
            expected
        );
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AmountsStatus::PendingConversionForTaxationPurposes).unwrap(),
            "\"PENDING_CONVERSION_FOR_TAXATION_PURPOSES\""
        );
        assert_eq!(AmountsStatus::Finalized.to_string(), "FINALIZED");
        assert!(AmountsStatus::PendingConversion.is_pending());
        assert!(!AmountsStatus::Finalized.is_pending());
    }
}
