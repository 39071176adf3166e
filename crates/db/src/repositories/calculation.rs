//! Amount calculation for expenses and incomes.

use sea_orm::DatabaseConnection;
use tally_core::amounts::{AmountsCalculator, AmountsInput, CalculatedAmounts};
use tally_shared::types::{CurrencyCode, MinorUnits};

use super::references::{ensure_currency_allowed, general_tax_rate};
use crate::entities::workspaces;
use crate::error::RepositoryError;

/// Amount fields of an expense or income as submitted.
#[derive(Debug, Clone)]
pub(crate) struct RecordAmounts<'a> {
    pub currency: &'a CurrencyCode,
    pub original_amount: MinorUnits,
    pub converted_amount_in_default_currency: Option<MinorUnits>,
    pub use_different_exchange_rate_for_income_tax_purposes: bool,
    pub income_taxable_amount_in_default_currency: Option<MinorUnits>,
    pub percent_on_business: i32,
    pub general_tax_id: Option<i64>,
}

/// Derived amounts together with the tax rate they were calculated with.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecordCalculation {
    pub amounts: CalculatedAmounts,
    pub general_tax_rate_in_bps: Option<i32>,
}

/// Validates the record against workspace settings and calculates its
/// amounts in the workspace default currency.
pub(crate) async fn calculate_record_amounts(
    db: &DatabaseConnection,
    workspace: &workspaces::Model,
    record: RecordAmounts<'_>,
) -> Result<RecordCalculation, RepositoryError> {
    ensure_currency_allowed(workspace, record.currency)?;

    let default_currency =
        CurrencyCode::parse(&workspace.default_currency).map_err(RepositoryError::Validation)?;
    let general_tax_rate_in_bps = general_tax_rate(db, workspace, record.general_tax_id).await?;

    let amounts = AmountsCalculator::calculate(&AmountsInput {
        original_amount: record.original_amount,
        currency: record.currency.clone(),
        default_currency,
        converted_amount_in_default_currency: record.converted_amount_in_default_currency,
        use_different_exchange_rate_for_income_tax_purposes: record
            .use_different_exchange_rate_for_income_tax_purposes,
        income_taxable_amount_in_default_currency: record.income_taxable_amount_in_default_currency,
        percent_on_business: record.percent_on_business,
        general_tax_rate_in_bps,
    })?;

    tracing::debug!(
        workspace_id = workspace.id,
        status = %amounts.status,
        general_tax_amount = ?amounts.general_tax_amount,
        "Record amounts calculated"
    );

    Ok(RecordCalculation {
        amounts,
        general_tax_rate_in_bps,
    })
}
