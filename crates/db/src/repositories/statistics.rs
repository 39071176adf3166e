//! Statistics queries.
//!
//! Rows are loaded with the few columns aggregation needs and aggregated by
//! the statistics service; no money arithmetic happens in SQL.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use tally_core::statistics::{
    AmountsStatistics, DateRange, IncomeTaxPaymentsStatistics, StatisticsEntry, StatisticsService,
};

use crate::entities::{expenses, income_tax_payments, incomes, sea_orm_active_enums::AmountsStatus};
use crate::error::RepositoryError;

type EntryRow = (Option<i64>, AmountsStatus, Option<i64>, Option<i64>);

fn to_entry((category_id, status, converted, taxable): EntryRow) -> StatisticsEntry {
    StatisticsEntry {
        category_id,
        status: status.into(),
        converted_adjusted_amount: converted,
        income_taxable_adjusted_amount: taxable,
    }
}

/// Statistics repository.
#[derive(Debug, Clone)]
pub struct StatisticsRepository {
    db: DatabaseConnection,
}

impl StatisticsRepository {
    /// Creates a new statistics repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Aggregates expenses paid within the range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a total overflows.
    pub async fn expenses(
        &self,
        workspace_id: i64,
        range: DateRange,
    ) -> Result<AmountsStatistics, RepositoryError> {
        let rows = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::CategoryId)
            .column(expenses::Column::Status)
            .column(expenses::Column::ConvertedAdjustedAmount)
            .column(expenses::Column::IncomeTaxableAdjustedAmount)
            .filter(expenses::Column::WorkspaceId.eq(workspace_id))
            .filter(expenses::Column::DatePaid.between(range.from_date, range.to_date))
            .into_tuple::<EntryRow>()
            .all(&self.db)
            .await?;

        tracing::debug!(workspace_id, rows = rows.len(), "Aggregating expense statistics");
        let statistics = StatisticsService::aggregate_amounts(rows.into_iter().map(to_entry))?;
        Ok(statistics)
    }

    /// Aggregates incomes received within the range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a total overflows.
    pub async fn incomes(
        &self,
        workspace_id: i64,
        range: DateRange,
    ) -> Result<AmountsStatistics, RepositoryError> {
        let rows = incomes::Entity::find()
            .select_only()
            .column(incomes::Column::CategoryId)
            .column(incomes::Column::Status)
            .column(incomes::Column::ConvertedAdjustedAmount)
            .column(incomes::Column::IncomeTaxableAdjustedAmount)
            .filter(incomes::Column::WorkspaceId.eq(workspace_id))
            .filter(incomes::Column::DateReceived.between(range.from_date, range.to_date))
            .into_tuple::<EntryRow>()
            .all(&self.db)
            .await?;

        tracing::debug!(workspace_id, rows = rows.len(), "Aggregating income statistics");
        let statistics = StatisticsService::aggregate_amounts(rows.into_iter().map(to_entry))?;
        Ok(statistics)
    }

    /// Sums income tax payments reported within the range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a total overflows.
    pub async fn income_tax_payments(
        &self,
        workspace_id: i64,
        range: DateRange,
    ) -> Result<IncomeTaxPaymentsStatistics, RepositoryError> {
        let amounts = income_tax_payments::Entity::find()
            .select_only()
            .column(income_tax_payments::Column::Amount)
            .filter(income_tax_payments::Column::WorkspaceId.eq(workspace_id))
            .filter(
                income_tax_payments::Column::ReportingDate.between(range.from_date, range.to_date),
            )
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;

        let statistics = StatisticsService::aggregate_income_tax_payments(amounts)?;
        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::status::AmountsStatus as Core;

    #[test]
    fn test_row_to_entry() {
        let entry = to_entry((Some(3), AmountsStatus::Finalized, Some(38182), Some(37727)));
        assert_eq!(entry.category_id, Some(3));
        assert_eq!(entry.status, Core::Finalized);
        assert_eq!(entry.converted_adjusted_amount, Some(38182));
        assert_eq!(entry.income_taxable_adjusted_amount, Some(37727));
    }

    #[test]
    fn test_pending_row_to_entry() {
        let entry = to_entry((None, AmountsStatus::PendingConversion, None, None));
        assert_eq!(entry.category_id, None);
        assert!(entry.status.is_pending());
    }
}
