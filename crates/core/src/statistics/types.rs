//! Statistics types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_shared::types::MinorUnits;

use super::error::StatisticsError;
use crate::status::AmountsStatus;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First included date.
    pub from_date: NaiveDate,
    /// Last included date.
    pub to_date: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting ranges that end before they start.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::InvalidDateRange` if `from_date > to_date`.
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> Result<Self, StatisticsError> {
        if from_date > to_date {
            return Err(StatisticsError::InvalidDateRange {
                from: from_date,
                to: to_date,
            });
        }
        Ok(Self { from_date, to_date })
    }

    /// Returns true if `date` falls within the range, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from_date <= date && date <= self.to_date
    }
}

/// One expense or income as seen by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsEntry {
    /// Category, if any.
    pub category_id: Option<i64>,
    /// Derived status.
    pub status: AmountsStatus,
    /// `convertedAmounts.adjustedAmountInDefaultCurrency`.
    pub converted_adjusted_amount: Option<MinorUnits>,
    /// `incomeTaxableAmounts.adjustedAmountInDefaultCurrency`.
    pub income_taxable_adjusted_amount: Option<MinorUnits>,
}

/// Aggregated metrics of a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsTotals {
    /// Sum of income taxable adjusted amounts of finalized entries.
    pub total_amount: MinorUnits,
    /// Number of finalized entries.
    pub finalized_count: u64,
    /// Number of entries in either pending status.
    pub pending_count: u64,
    /// Sum of converted minus income taxable adjusted amounts of finalized entries.
    pub currency_exchange_difference: MinorUnits,
}

impl StatisticsTotals {
    /// Adds one entry to the totals.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::Overflow` if a sum does not fit into `i64`.
    pub fn add(&mut self, entry: &StatisticsEntry) -> Result<(), StatisticsError> {
        if entry.status.is_pending() {
            self.pending_count += 1;
            return Ok(());
        }

        let taxable = entry.income_taxable_adjusted_amount.unwrap_or_default();
        let converted = entry.converted_adjusted_amount.unwrap_or_default();
        let difference = converted
            .checked_sub(taxable)
            .ok_or(StatisticsError::Overflow)?;

        self.total_amount = self
            .total_amount
            .checked_add(taxable)
            .ok_or(StatisticsError::Overflow)?;
        self.currency_exchange_difference = self
            .currency_exchange_difference
            .checked_add(difference)
            .ok_or(StatisticsError::Overflow)?;
        self.finalized_count += 1;
        Ok(())
    }
}

/// Statistics of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAmountsStatistics {
    /// Category ID.
    pub category_id: i64,
    /// Metrics of the category.
    #[serde(flatten)]
    pub totals: StatisticsTotals,
}

/// Statistics of expenses or incomes in a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountsStatistics {
    /// Metrics over all entries, uncategorized included.
    #[serde(flatten)]
    pub totals: StatisticsTotals,
    /// Per-category metrics, ordered by category ID; uncategorized entries are not listed.
    pub items: Vec<CategoryAmountsStatistics>,
}

/// Statistics of income tax payments in a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeTaxPaymentsStatistics {
    /// Sum of payment amounts.
    pub total_tax_payments: MinorUnits,
}
