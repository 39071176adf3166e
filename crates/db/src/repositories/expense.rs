//! Expense repository.
//!
//! Every create and update recalculates the amounts in default currency,
//! the general tax amount and the status from the submitted fields.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use serde::Deserialize;
use tally_shared::types::{CurrencyCode, MinorUnits, PageRequest, PageResponse};

use super::calculation::{RecordAmounts, RecordCalculation, calculate_record_amounts};
use super::pagination::fetch_page;
use super::references::{dedup_attachments, ensure_category, ensure_documents, ensure_not_blank};
use crate::entities::{expenses, workspaces};
use crate::error::RepositoryError;

const ENTITY: &str = "Expense";

/// Expense fields set by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    /// Optional category.
    #[serde(default)]
    pub category_id: Option<i64>,
    /// What was paid for.
    pub title: String,
    /// Payment date.
    pub date_paid: NaiveDate,
    /// Currency the expense was paid in.
    pub currency: CurrencyCode,
    /// Amount paid, in `currency`.
    pub original_amount: MinorUnits,
    /// Amount in default currency, once known.
    #[serde(default)]
    pub converted_amount_in_default_currency: Option<MinorUnits>,
    /// Whether tax reporting uses its own exchange rate.
    #[serde(default)]
    pub use_different_exchange_rate_for_income_tax_purposes: bool,
    /// Amount in default currency at the tax reporting rate.
    #[serde(default)]
    pub income_taxable_amount_in_default_currency: Option<MinorUnits>,
    /// Business share in percent.
    #[serde(default = "full_business_use")]
    pub percent_on_business: i32,
    /// General tax included in the amount.
    #[serde(default)]
    pub general_tax_id: Option<i64>,
    /// Attached document ids.
    #[serde(default)]
    pub attachments: Vec<i64>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

const fn full_business_use() -> i32 {
    100
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an expense.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is blank or an amount is negative
    /// - The currency or general tax is not allowed by the workspace
    /// - The category, general tax or an attachment does not exist
    /// - Database operation fails
    pub async fn create(
        &self,
        workspace: &workspaces::Model,
        input: ExpenseInput,
    ) -> Result<expenses::Model, RepositoryError> {
        let calculation = self.prepare(workspace, &input).await?;

        let mut expense = changes(input, &calculation);
        expense.workspace_id = Set(workspace.id);
        expense.time_recorded = Set(Utc::now().into());
        expense.version = Set(0);

        let expense = expense.insert(&self.db).await?;
        tracing::info!(
            workspace_id = workspace.id,
            expense_id = expense.id,
            status = %calculation.amounts.status,
            "Expense created"
        );
        Ok(expense)
    }

    /// Lists expenses of the workspace, latest payments first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        workspace_id: i64,
        page: &PageRequest,
    ) -> Result<PageResponse<expenses::Model>, RepositoryError> {
        let query = expenses::Entity::find()
            .filter(expenses::Column::WorkspaceId.eq(workspace_id))
            .order_by_desc(expenses::Column::DatePaid)
            .order_by_desc(expenses::Column::Id);
        fetch_page(&self.db, query, page).await
    }

    /// Gets an expense of the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if it does not exist in the workspace.
    pub async fn get(
        &self,
        workspace_id: i64,
        expense_id: i64,
    ) -> Result<expenses::Model, RepositoryError> {
        expenses::Entity::find_by_id(expense_id)
            .filter(expenses::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::not_found(ENTITY, expense_id))
    }

    /// Replaces an expense if `version` is current and recalculates it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`], plus [`RepositoryError::NotFound`] for a
    /// missing expense and [`RepositoryError::StaleVersion`] on a version
    /// mismatch.
    pub async fn update(
        &self,
        workspace: &workspaces::Model,
        expense_id: i64,
        version: i64,
        input: ExpenseInput,
    ) -> Result<expenses::Model, RepositoryError> {
        let calculation = self.prepare(workspace, &input).await?;

        let updated = expenses::Entity::update_many()
            .set(changes(input, &calculation))
            .col_expr(
                expenses::Column::Version,
                Expr::col(expenses::Column::Version).add(1),
            )
            .filter(expenses::Column::Id.eq(expense_id))
            .filter(expenses::Column::WorkspaceId.eq(workspace.id))
            .filter(expenses::Column::Version.eq(version))
            .exec_with_returning(&self.db)
            .await?;

        if let Some(expense) = updated.into_iter().next() {
            tracing::info!(
                workspace_id = workspace.id,
                expense_id,
                version = expense.version,
                status = %calculation.amounts.status,
                "Expense updated"
            );
            return Ok(expense);
        }

        self.get(workspace.id, expense_id).await?;
        tracing::warn!(workspace_id = workspace.id, expense_id, version, "Stale expense version");
        Err(RepositoryError::StaleVersion {
            entity: ENTITY,
            id: expense_id,
        })
    }

    async fn prepare(
        &self,
        workspace: &workspaces::Model,
        input: &ExpenseInput,
    ) -> Result<RecordCalculation, RepositoryError> {
        ensure_not_blank("title", &input.title)?;
        ensure_category(&self.db, workspace.id, input.category_id).await?;
        ensure_documents(&self.db, workspace.id, &input.attachments).await?;

        calculate_record_amounts(
            &self.db,
            workspace,
            RecordAmounts {
                currency: &input.currency,
                original_amount: input.original_amount,
                converted_amount_in_default_currency: input.converted_amount_in_default_currency,
                use_different_exchange_rate_for_income_tax_purposes: input
                    .use_different_exchange_rate_for_income_tax_purposes,
                income_taxable_amount_in_default_currency: input
                    .income_taxable_amount_in_default_currency,
                percent_on_business: input.percent_on_business,
                general_tax_id: input.general_tax_id,
            },
        )
        .await
    }
}

fn changes(input: ExpenseInput, calculation: &RecordCalculation) -> expenses::ActiveModel {
    let amounts = &calculation.amounts;
    expenses::ActiveModel {
        category_id: Set(input.category_id),
        title: Set(input.title),
        date_paid: Set(input.date_paid),
        currency: Set(input.currency.into()),
        original_amount: Set(input.original_amount),
        converted_original_amount: Set(amounts
            .converted_amounts
            .original_amount_in_default_currency),
        converted_adjusted_amount: Set(amounts
            .converted_amounts
            .adjusted_amount_in_default_currency),
        income_taxable_original_amount: Set(amounts
            .income_taxable_amounts
            .original_amount_in_default_currency),
        income_taxable_adjusted_amount: Set(amounts
            .income_taxable_amounts
            .adjusted_amount_in_default_currency),
        use_different_exchange_rate_for_income_tax_purposes: Set(
            amounts.use_different_exchange_rate_for_income_tax_purposes
        ),
        percent_on_business: Set(input.percent_on_business),
        general_tax_id: Set(input.general_tax_id),
        general_tax_rate_in_bps: Set(calculation.general_tax_rate_in_bps),
        general_tax_amount: Set(amounts.general_tax_amount),
        status: Set(amounts.status.into()),
        attachments: Set(dedup_attachments(input.attachments)),
        notes: Set(input.notes),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    }
}
