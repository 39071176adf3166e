//! Statistics aggregation service.

use std::collections::BTreeMap;

use tally_shared::types::MinorUnits;

use super::error::StatisticsError;
use super::types::{
    AmountsStatistics, CategoryAmountsStatistics, IncomeTaxPaymentsStatistics, StatisticsEntry,
    StatisticsTotals,
};

/// Service for aggregating statistics.
pub struct StatisticsService;

impl StatisticsService {
    /// Aggregates expenses or incomes already filtered by workspace and date range.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::Overflow` if a total does not fit into `i64`.
    pub fn aggregate_amounts<I>(entries: I) -> Result<AmountsStatistics, StatisticsError>
    where
        I: IntoIterator<Item = StatisticsEntry>,
    {
        let mut totals = StatisticsTotals::default();
        let mut by_category: BTreeMap<i64, StatisticsTotals> = BTreeMap::new();

        for entry in entries {
            totals.add(&entry)?;
            if let Some(category_id) = entry.category_id {
                by_category.entry(category_id).or_default().add(&entry)?;
            }
        }

        Ok(AmountsStatistics {
            totals,
            items: by_category
                .into_iter()
                .map(|(category_id, totals)| CategoryAmountsStatistics {
                    category_id,
                    totals,
                })
                .collect(),
        })
    }

    /// Sums income tax payment amounts already filtered by reporting date.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::Overflow` if the sum does not fit into `i64`.
    pub fn aggregate_income_tax_payments<I>(
        amounts: I,
    ) -> Result<IncomeTaxPaymentsStatistics, StatisticsError>
    where
        I: IntoIterator<Item = MinorUnits>,
    {
        let total_tax_payments = amounts
            .into_iter()
            .try_fold(0, MinorUnits::checked_add)
            .ok_or(StatisticsError::Overflow)?;
        Ok(IncomeTaxPaymentsStatistics { total_tax_payments })
    }
}
