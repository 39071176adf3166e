//! General tax and business share calculation.
//!
//! Rounding strategy:
//! - Every intermediate result is rounded to whole minor units
//! - Midpoints round away from zero (38181.5 -> 38182)
//! - General tax is included in the gross amount and split out of it

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tally_shared::types::MinorUnits;

use super::error::AmountsError;
use super::types::{AmountsInDefaultCurrency, AmountsInput, CalculatedAmounts};
use crate::status::AmountsStatus;

/// 100% expressed in basis points.
pub const BPS_IN_WHOLE: i32 = 10_000;

/// Calculator for amounts in default currency.
pub struct AmountsCalculator;

impl AmountsCalculator {
    /// Calculates converted and income taxable amounts, tax and status.
    ///
    /// Records in the default currency are converted implicitly and never
    /// use a different exchange rate for tax purposes.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount is negative, the business share or tax
    /// rate is out of range, or a result overflows.
    pub fn calculate(input: &AmountsInput) -> Result<CalculatedAmounts, AmountsError> {
        Self::validate(input)?;

        let same_currency = input.currency == input.default_currency;
        let use_different_rate =
            !same_currency && input.use_different_exchange_rate_for_income_tax_purposes;

        let converted_original = if same_currency {
            Some(input.original_amount)
        } else {
            input.converted_amount_in_default_currency
        };
        let taxable_original = if use_different_rate {
            input.income_taxable_amount_in_default_currency
        } else {
            converted_original
        };

        let rate = input.general_tax_rate_in_bps;
        let converted_amounts =
            Self::amounts_in_default_currency(converted_original, input.percent_on_business, rate)?;
        let income_taxable_amounts =
            Self::amounts_in_default_currency(taxable_original, input.percent_on_business, rate)?;

        let general_tax_amount = match (rate, income_taxable_amounts.adjusted_amount_in_default_currency)
        {
            (Some(rate), Some(adjusted)) => Some(Self::tax_amount(adjusted, rate)?),
            _ => None,
        };

        let status = AmountsStatus::derive(
            &converted_amounts,
            &income_taxable_amounts,
            use_different_rate,
        );

        Ok(CalculatedAmounts {
            converted_amounts,
            income_taxable_amounts,
            use_different_exchange_rate_for_income_tax_purposes: use_different_rate,
            general_tax_amount,
            status,
        })
    }

    /// Business share of a gross amount with general tax excluded.
    ///
    /// # Errors
    ///
    /// Returns `AmountsError::InvalidTaxRate` for rates outside 0..=10000 bps
    /// and `AmountsError::Overflow` if the result does not fit into `i64`.
    pub fn adjusted_amount(
        gross: MinorUnits,
        percent_on_business: i32,
        general_tax_rate_in_bps: Option<i32>,
    ) -> Result<MinorUnits, AmountsError> {
        if let Some(rate) = general_tax_rate_in_bps {
            validate_tax_rate(rate)?;
        }

        let business = round_to_minor_units(
            Decimal::from(gross) * Decimal::from(percent_on_business) / Decimal::ONE_HUNDRED,
        )?;

        match general_tax_rate_in_bps {
            Some(rate) if rate != 0 => round_to_minor_units(
                Decimal::from(business) * Decimal::from(BPS_IN_WHOLE)
                    / Decimal::from(BPS_IN_WHOLE + rate),
            ),
            _ => Ok(business),
        }
    }

    /// General tax on top of an amount that excludes it.
    ///
    /// # Errors
    ///
    /// Returns `AmountsError::Overflow` if the result does not fit into `i64`.
    pub fn tax_amount(
        adjusted: MinorUnits,
        general_tax_rate_in_bps: i32,
    ) -> Result<MinorUnits, AmountsError> {
        round_to_minor_units(
            Decimal::from(adjusted) * Decimal::from(general_tax_rate_in_bps)
                / Decimal::from(BPS_IN_WHOLE),
        )
    }

    fn amounts_in_default_currency(
        original: Option<MinorUnits>,
        percent_on_business: i32,
        general_tax_rate_in_bps: Option<i32>,
    ) -> Result<AmountsInDefaultCurrency, AmountsError> {
        let adjusted = original
            .map(|gross| Self::adjusted_amount(gross, percent_on_business, general_tax_rate_in_bps))
            .transpose()?;

        Ok(AmountsInDefaultCurrency {
            original_amount_in_default_currency: original,
            adjusted_amount_in_default_currency: adjusted,
        })
    }

    fn validate(input: &AmountsInput) -> Result<(), AmountsError> {
        ensure_not_negative("originalAmount", Some(input.original_amount))?;
        ensure_not_negative(
            "convertedAmountInDefaultCurrency",
            input.converted_amount_in_default_currency,
        )?;
        ensure_not_negative(
            "incomeTaxableAmountInDefaultCurrency",
            input.income_taxable_amount_in_default_currency,
        )?;

        if !(0..=100).contains(&input.percent_on_business) {
            return Err(AmountsError::InvalidPercentOnBusiness(
                input.percent_on_business,
            ));
        }

        if let Some(rate) = input.general_tax_rate_in_bps {
            validate_tax_rate(rate)?;
        }

        Ok(())
    }
}

/// Checks that a general tax rate is within 0..=10000 bps.
///
/// # Errors
///
/// Returns `AmountsError::InvalidTaxRate` for out-of-range rates.
pub fn validate_tax_rate(rate_in_bps: i32) -> Result<(), AmountsError> {
    if (0..=BPS_IN_WHOLE).contains(&rate_in_bps) {
        Ok(())
    } else {
        Err(AmountsError::InvalidTaxRate(rate_in_bps))
    }
}

fn ensure_not_negative(field: &'static str, value: Option<MinorUnits>) -> Result<(), AmountsError> {
    match value {
        Some(value) if value < 0 => Err(AmountsError::NegativeAmount { field, value }),
        _ => Ok(()),
    }
}

fn round_to_minor_units(value: Decimal) -> Result<MinorUnits, AmountsError> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(AmountsError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_shared::types::CurrencyCode;

    fn currency(code: &str) -> CurrencyCode {
        CurrencyCode::parse(code).unwrap()
    }

    /// Expense in AUD for a USD workspace, 10% tax, fully business.
    fn foreign_input() -> AmountsInput {
        AmountsInput {
            original_amount: 30000,
            currency: currency("AUD"),
            default_currency: currency("USD"),
            converted_amount_in_default_currency: Some(42000),
            use_different_exchange_rate_for_income_tax_purposes: false,
            income_taxable_amount_in_default_currency: None,
            percent_on_business: 100,
            general_tax_rate_in_bps: Some(1000),
        }
    }

    #[test]
    fn test_converted_amount_with_tax() {
        let result = AmountsCalculator::calculate(&foreign_input()).unwrap();

        assert_eq!(
            result.converted_amounts,
            AmountsInDefaultCurrency {
                original_amount_in_default_currency: Some(42000),
                adjusted_amount_in_default_currency: Some(38182),
            }
        );
        assert_eq!(result.income_taxable_amounts, result.converted_amounts);
        assert_eq!(result.general_tax_amount, Some(3818));
        assert_eq!(result.status, AmountsStatus::Finalized);
    }

    #[test]
    fn test_different_exchange_rate_for_tax_purposes() {
        let input = AmountsInput {
            use_different_exchange_rate_for_income_tax_purposes: true,
            income_taxable_amount_in_default_currency: Some(41500),
            ..foreign_input()
        };
        let result = AmountsCalculator::calculate(&input).unwrap();

        assert_eq!(
            result.converted_amounts.adjusted_amount_in_default_currency,
            Some(38182)
        );
        assert_eq!(
            result.income_taxable_amounts,
            AmountsInDefaultCurrency {
                original_amount_in_default_currency: Some(41500),
                adjusted_amount_in_default_currency: Some(37727),
            }
        );
        assert_eq!(result.general_tax_amount, Some(3773));
        assert!(result.use_different_exchange_rate_for_income_tax_purposes);
        assert_eq!(result.status, AmountsStatus::Finalized);
    }

    #[test]
    fn test_pending_conversion_keeps_amounts_empty() {
        let input = AmountsInput {
            converted_amount_in_default_currency: None,
            ..foreign_input()
        };
        let result = AmountsCalculator::calculate(&input).unwrap();

        assert_eq!(result.converted_amounts, AmountsInDefaultCurrency::empty());
        assert_eq!(result.income_taxable_amounts, AmountsInDefaultCurrency::empty());
        assert_eq!(result.general_tax_amount, None);
        assert_eq!(result.status, AmountsStatus::PendingConversion);
    }

    #[test]
    fn test_pending_conversion_for_taxation_purposes() {
        let input = AmountsInput {
            use_different_exchange_rate_for_income_tax_purposes: true,
            income_taxable_amount_in_default_currency: None,
            ..foreign_input()
        };
        let result = AmountsCalculator::calculate(&input).unwrap();

        assert!(result.converted_amounts.is_adjusted());
        assert_eq!(result.income_taxable_amounts, AmountsInDefaultCurrency::empty());
        assert_eq!(result.general_tax_amount, None);
        assert_eq!(
            result.status,
            AmountsStatus::PendingConversionForTaxationPurposes
        );
    }

    #[test]
    fn test_default_currency_is_converted_implicitly() {
        let input = AmountsInput {
            original_amount: 150,
            currency: currency("USD"),
            default_currency: currency("USD"),
            converted_amount_in_default_currency: None,
            use_different_exchange_rate_for_income_tax_purposes: true,
            income_taxable_amount_in_default_currency: Some(999),
            percent_on_business: 100,
            general_tax_rate_in_bps: None,
        };
        let result = AmountsCalculator::calculate(&input).unwrap();

        let expected = AmountsInDefaultCurrency {
            original_amount_in_default_currency: Some(150),
            adjusted_amount_in_default_currency: Some(150),
        };
        assert_eq!(result.converted_amounts, expected);
        assert_eq!(result.income_taxable_amounts, expected);
        assert!(!result.use_different_exchange_rate_for_income_tax_purposes);
        assert_eq!(result.general_tax_amount, None);
        assert_eq!(result.status, AmountsStatus::Finalized);
    }

    #[test]
    fn test_percent_on_business_applies_before_tax() {
        // 42000 * 50% = 21000; 21000 / 1.1 = 19090.9 -> 19091; tax 1909.1 -> 1909
        let input = AmountsInput {
            percent_on_business: 50,
            ..foreign_input()
        };
        let result = AmountsCalculator::calculate(&input).unwrap();

        assert_eq!(
            result.converted_amounts.adjusted_amount_in_default_currency,
            Some(19091)
        );
        assert_eq!(result.general_tax_amount, Some(1909));
    }

    #[test]
    fn test_zero_percent_on_business() {
        let input = AmountsInput {
            percent_on_business: 0,
            ..foreign_input()
        };
        let result = AmountsCalculator::calculate(&input).unwrap();

        assert_eq!(
            result.converted_amounts.adjusted_amount_in_default_currency,
            Some(0)
        );
        assert_eq!(result.general_tax_amount, Some(0));
        assert_eq!(result.status, AmountsStatus::Finalized);
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        // 101 * 50% = 50.5 -> 51
        assert_eq!(AmountsCalculator::adjusted_amount(101, 50, None).unwrap(), 51);
        // 105 * 1000 bps / 10000 = 10.5 -> 11
        assert_eq!(AmountsCalculator::tax_amount(105, 1000).unwrap(), 11);
    }

    #[test]
    fn test_zero_tax_rate_keeps_amount() {
        assert_eq!(
            AmountsCalculator::adjusted_amount(42000, 100, Some(0)).unwrap(),
            42000
        );
        assert_eq!(AmountsCalculator::tax_amount(42000, 0).unwrap(), 0);
    }

    #[test]
    fn test_validation_errors() {
        let negative = AmountsInput {
            original_amount: -1,
            ..foreign_input()
        };
        assert_eq!(
            AmountsCalculator::calculate(&negative),
            Err(AmountsError::NegativeAmount {
                field: "originalAmount",
                value: -1
            })
        );

        let negative_converted = AmountsInput {
            converted_amount_in_default_currency: Some(-5),
            ..foreign_input()
        };
        assert!(matches!(
            AmountsCalculator::calculate(&negative_converted),
            Err(AmountsError::NegativeAmount { .. })
        ));

        let percent = AmountsInput {
            percent_on_business: 101,
            ..foreign_input()
        };
        assert_eq!(
            AmountsCalculator::calculate(&percent),
            Err(AmountsError::InvalidPercentOnBusiness(101))
        );

        let rate = AmountsInput {
            general_tax_rate_in_bps: Some(-10),
            ..foreign_input()
        };
        assert_eq!(
            AmountsCalculator::calculate(&rate),
            Err(AmountsError::InvalidTaxRate(-10))
        );
    }

    #[test]
    fn test_validate_tax_rate_bounds() {
        assert!(validate_tax_rate(0).is_ok());
        assert!(validate_tax_rate(BPS_IN_WHOLE).is_ok());
        assert!(validate_tax_rate(BPS_IN_WHOLE + 1).is_err());
    }

    #[test]
    fn test_round_to_minor_units() {
        assert_eq!(round_to_minor_units(dec!(38181.5)).unwrap(), 38182);
        assert_eq!(round_to_minor_units(dec!(19090.909)).unwrap(), 19091);
        assert_eq!(round_to_minor_units(dec!(-0.5)).unwrap(), -1);
        assert_eq!(round_to_minor_units(Decimal::MAX), Err(AmountsError::Overflow));
    }
}
