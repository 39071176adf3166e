//! Income repository.
//!
//! Incomes are calculated like expenses, with the whole amount counted as
//! business income.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use serde::Deserialize;
use tally_shared::types::{CurrencyCode, MinorUnits, PageRequest, PageResponse};

use super::calculation::{RecordAmounts, RecordCalculation, calculate_record_amounts};
use super::pagination::fetch_page;
use super::references::{
    dedup_attachments, ensure_category, ensure_documents, ensure_invoice, ensure_not_blank,
};
use crate::entities::{incomes, workspaces};
use crate::error::RepositoryError;

const ENTITY: &str = "Income";

/// Income fields set by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeInput {
    /// Optional category.
    #[serde(default)]
    pub category_id: Option<i64>,
    /// What was received for.
    pub title: String,
    /// Date the money was received.
    pub date_received: NaiveDate,
    /// Currency the income was received in.
    pub currency: CurrencyCode,
    /// Amount received, in `currency`.
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
    /// General tax included in the amount.
    #[serde(default)]
    pub general_tax_id: Option<i64>,
    /// Invoice this income settles.
    #[serde(default)]
    pub linked_invoice_id: Option<i64>,
    /// Attached document ids.
    #[serde(default)]
    pub attachments: Vec<i64>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

const FULL_BUSINESS_USE: i32 = 100;

/// Income repository.
#[derive(Debug, Clone)]
pub struct IncomeRepository {
    db: DatabaseConnection,
}

impl IncomeRepository {
    /// Creates a new income repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an income.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is blank or an amount is negative
    /// - The currency or general tax is not allowed by the workspace
    /// - The category, general tax, linked invoice or an attachment does not exist
    /// - Database operation fails
    pub async fn create(
        &self,
        workspace: &workspaces::Model,
        input: IncomeInput,
    ) -> Result<incomes::Model, RepositoryError> {
        let calculation = self.prepare(workspace, &input).await?;

        let mut income = changes(input, &calculation);
        income.workspace_id = Set(workspace.id);
        income.time_recorded = Set(Utc::now().into());
        income.version = Set(0);

        let income = income.insert(&self.db).await?;
        tracing::info!(
            workspace_id = workspace.id,
            income_id = income.id,
            status = %calculation.amounts.status,
            "Income created"
        );
        Ok(income)
    }

    /// Lists incomes of the workspace, latest receipts first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        workspace_id: i64,
        page: &PageRequest,
    ) -> Result<PageResponse<incomes::Model>, RepositoryError> {
        let query = incomes::Entity::find()
            .filter(incomes::Column::WorkspaceId.eq(workspace_id))
            .order_by_desc(incomes::Column::DateReceived)
            .order_by_desc(incomes::Column::Id);
        fetch_page(&self.db, query, page).await
    }

    /// Gets an income of the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if it does not exist in the workspace.
    pub async fn get(
        &self,
        workspace_id: i64,
        income_id: i64,
    ) -> Result<incomes::Model, RepositoryError> {
        incomes::Entity::find_by_id(income_id)
            .filter(incomes::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::not_found(ENTITY, income_id))
    }

    /// Replaces an income if `version` is current and recalculates it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`], plus [`RepositoryError::NotFound`] for a
    /// missing income and [`RepositoryError::StaleVersion`] on a version
    /// mismatch.
    pub async fn update(
        &self,
        workspace: &workspaces::Model,
        income_id: i64,
        version: i64,
        input: IncomeInput,
    ) -> Result<incomes::Model, RepositoryError> {
        let calculation = self.prepare(workspace, &input).await?;

        let updated = incomes::Entity::update_many()
            .set(changes(input, &calculation))
            .col_expr(
                incomes::Column::Version,
                Expr::col(incomes::Column::Version).add(1),
            )
            .filter(incomes::Column::Id.eq(income_id))
            .filter(incomes::Column::WorkspaceId.eq(workspace.id))
            .filter(incomes::Column::Version.eq(version))
            .exec_with_returning(&self.db)
            .await?;

        if let Some(income) = updated.into_iter().next() {
            tracing::info!(
                workspace_id = workspace.id,
                income_id,
                version = income.version,
                status = %calculation.amounts.status,
                "Income updated"
            );
            return Ok(income);
        }

        self.get(workspace.id, income_id).await?;
        tracing::warn!(workspace_id = workspace.id, income_id, version, "Stale income version");
        Err(RepositoryError::StaleVersion {
            entity: ENTITY,
            id: income_id,
        })
    }

    async fn prepare(
        &self,
        workspace: &workspaces::Model,
        input: &IncomeInput,
    ) -> Result<RecordCalculation, RepositoryError> {
        ensure_not_blank("title", &input.title)?;
        ensure_category(&self.db, workspace.id, input.category_id).await?;
        ensure_invoice(&self.db, workspace.id, input.linked_invoice_id).await?;
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
                percent_on_business: FULL_BUSINESS_USE,
                general_tax_id: input.general_tax_id,
            },
        )
        .await
    }
}

fn changes(input: IncomeInput, calculation: &RecordCalculation) -> incomes::ActiveModel {
    let amounts = &calculation.amounts;
    incomes::ActiveModel {
        category_id: Set(input.category_id),
        title: Set(input.title),
        date_received: Set(input.date_received),
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
        general_tax_id: Set(input.general_tax_id),
        general_tax_rate_in_bps: Set(calculation.general_tax_rate_in_bps),
        general_tax_amount: Set(amounts.general_tax_amount),
        linked_invoice_id: Set(input.linked_invoice_id),
        status: Set(amounts.status.into()),
        attachments: Set(dedup_attachments(input.attachments)),
        notes: Set(input.notes),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    }
}
