//! Property-based tests for amount calculation.

use proptest::prelude::*;
use tally_shared::types::CurrencyCode;

use super::calculator::AmountsCalculator;
use super::types::AmountsInput;
use crate::status::AmountsStatus;

fn amount() -> impl Strategy<Value = i64> {
    0i64..10_000_000_000
}

fn currency() -> impl Strategy<Value = CurrencyCode> {
    prop_oneof![Just("USD"), Just("EUR"), Just("AUD")]
        .prop_map(|code| CurrencyCode::parse(code).unwrap())
}

fn input() -> impl Strategy<Value = AmountsInput> {
    (
        amount(),
        currency(),
        currency(),
        proptest::option::of(amount()),
        any::<bool>(),
        proptest::option::of(amount()),
        0i32..=100,
        proptest::option::of(0i32..=10_000),
    )
        .prop_map(
            |(
                original_amount,
                currency,
                default_currency,
                converted,
                use_different_rate,
                taxable,
                percent_on_business,
                rate,
            )| AmountsInput {
                original_amount,
                currency,
                default_currency,
                converted_amount_in_default_currency: converted,
                use_different_exchange_rate_for_income_tax_purposes: use_different_rate,
                income_taxable_amount_in_default_currency: taxable,
                percent_on_business,
                general_tax_rate_in_bps: rate,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Pending conversion exactly when the converted adjusted amount is absent.
    #[test]
    fn prop_pending_conversion_iff_not_converted(input in input()) {
        let result = AmountsCalculator::calculate(&input).unwrap();

        prop_assert_eq!(
            result.status == AmountsStatus::PendingConversion,
            result.converted_amounts.adjusted_amount_in_default_currency.is_none()
        );
    }

    /// Without a separate tax exchange rate both amount sets are identical.
    #[test]
    fn prop_same_rate_means_same_amounts(input in input()) {
        let result = AmountsCalculator::calculate(&input).unwrap();

        if !result.use_different_exchange_rate_for_income_tax_purposes {
            prop_assert_eq!(result.income_taxable_amounts, result.converted_amounts);
        }
    }

    /// Adjusted amounts never exist without their original amount.
    #[test]
    fn prop_adjusted_implies_original(input in input()) {
        let result = AmountsCalculator::calculate(&input).unwrap();

        for amounts in [result.converted_amounts, result.income_taxable_amounts] {
            if amounts.adjusted_amount_in_default_currency.is_some() {
                prop_assert!(amounts.original_amount_in_default_currency.is_some());
            }
        }
    }

    /// Tax is only ever computed from a known income taxable amount.
    #[test]
    fn prop_tax_requires_taxable_base(input in input()) {
        let result = AmountsCalculator::calculate(&input).unwrap();

        if result.general_tax_amount.is_some() {
            prop_assert!(result.income_taxable_amounts.is_adjusted());
            prop_assert!(input.general_tax_rate_in_bps.is_some());
        }
    }

    /// Adjusted amount never exceeds the gross amount.
    #[test]
    fn prop_adjusted_not_above_gross(
        gross in amount(),
        percent in 0i32..=100,
        rate in proptest::option::of(0i32..=10_000),
    ) {
        let adjusted = AmountsCalculator::adjusted_amount(gross, percent, rate).unwrap();

        prop_assert!(adjusted >= 0);
        prop_assert!(adjusted <= gross);
    }

    /// Calculation is deterministic.
    #[test]
    fn prop_calculation_is_deterministic(input in input()) {
        prop_assert_eq!(
            AmountsCalculator::calculate(&input).unwrap(),
            AmountsCalculator::calculate(&input).unwrap()
        );
    }
}
