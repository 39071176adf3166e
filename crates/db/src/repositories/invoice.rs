//! Invoice repository.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use serde::Deserialize;
use tally_core::status::InvoiceDates;
use tally_shared::types::{CurrencyCode, MinorUnits, PageRequest, PageResponse};

use super::pagination::fetch_page;
use super::references::{
    dedup_attachments, ensure_currency_allowed, ensure_customer, ensure_documents,
    ensure_not_blank, ensure_not_negative, general_tax_rate,
};
use crate::entities::{invoices, workspaces};
use crate::error::RepositoryError;

const ENTITY: &str = "Invoice";

/// Invoice fields set by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    /// Billed customer.
    pub customer_id: i64,
    /// Invoice title.
    pub title: String,
    /// Issue date.
    pub date_issued: NaiveDate,
    /// Date the invoice was sent.
    #[serde(default)]
    pub date_sent: Option<NaiveDate>,
    /// Date the invoice was paid.
    #[serde(default)]
    pub date_paid: Option<NaiveDate>,
    /// Date the invoice was cancelled.
    #[serde(default)]
    pub date_cancelled: Option<NaiveDate>,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Invoice currency.
    pub currency: CurrencyCode,
    /// Billed amount, in `currency`.
    pub amount: MinorUnits,
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

/// Dates of a stored invoice used for status derivation.
#[must_use]
pub const fn invoice_dates(invoice: &invoices::Model) -> InvoiceDates {
    InvoiceDates {
        date_sent: invoice.date_sent,
        date_paid: invoice.date_paid,
        date_cancelled: invoice.date_cancelled,
        due_date: invoice.due_date,
    }
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is blank or the amount is negative
    /// - The currency or general tax is not allowed by the workspace
    /// - The customer, general tax or an attachment does not exist
    /// - Database operation fails
    pub async fn create(
        &self,
        workspace: &workspaces::Model,
        input: InvoiceInput,
    ) -> Result<invoices::Model, RepositoryError> {
        self.validate(workspace, &input).await?;

        let mut invoice = changes(input);
        invoice.workspace_id = Set(workspace.id);
        invoice.time_recorded = Set(Utc::now().into());
        invoice.version = Set(0);

        let invoice = invoice.insert(&self.db).await?;
        tracing::info!(
            workspace_id = workspace.id,
            invoice_id = invoice.id,
            customer_id = invoice.customer_id,
            "Invoice created"
        );
        Ok(invoice)
    }

    /// Lists invoices of the workspace, latest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        workspace_id: i64,
        page: &PageRequest,
    ) -> Result<PageResponse<invoices::Model>, RepositoryError> {
        let query = invoices::Entity::find()
            .filter(invoices::Column::WorkspaceId.eq(workspace_id))
            .order_by_desc(invoices::Column::DateIssued)
            .order_by_desc(invoices::Column::Id);
        fetch_page(&self.db, query, page).await
    }

    /// Gets an invoice of the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if it does not exist in the workspace.
    pub async fn get(
        &self,
        workspace_id: i64,
        invoice_id: i64,
    ) -> Result<invoices::Model, RepositoryError> {
        invoices::Entity::find_by_id(invoice_id)
            .filter(invoices::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::not_found(ENTITY, invoice_id))
    }

    /// Replaces an invoice if `version` is current.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`], plus [`RepositoryError::StaleVersion`] on a
    /// version mismatch.
    pub async fn update(
        &self,
        workspace: &workspaces::Model,
        invoice_id: i64,
        version: i64,
        input: InvoiceInput,
    ) -> Result<invoices::Model, RepositoryError> {
        self.validate(workspace, &input).await?;

        let updated = invoices::Entity::update_many()
            .set(changes(input))
            .col_expr(
                invoices::Column::Version,
                Expr::col(invoices::Column::Version).add(1),
            )
            .filter(invoices::Column::Id.eq(invoice_id))
            .filter(invoices::Column::WorkspaceId.eq(workspace.id))
            .filter(invoices::Column::Version.eq(version))
            .exec_with_returning(&self.db)
            .await?;

        if let Some(invoice) = updated.into_iter().next() {
            tracing::info!(
                workspace_id = workspace.id,
                invoice_id,
                version = invoice.version,
                "Invoice updated"
            );
            return Ok(invoice);
        }

        self.get(workspace.id, invoice_id).await?;
        Err(RepositoryError::StaleVersion {
            entity: ENTITY,
            id: invoice_id,
        })
    }

    async fn validate(
        &self,
        workspace: &workspaces::Model,
        input: &InvoiceInput,
    ) -> Result<(), RepositoryError> {
        ensure_not_blank("title", &input.title)?;
        ensure_not_negative("amount", input.amount)?;
        ensure_currency_allowed(workspace, &input.currency)?;
        ensure_customer(&self.db, workspace.id, input.customer_id).await?;
        general_tax_rate(&self.db, workspace, input.general_tax_id).await?;
        ensure_documents(&self.db, workspace.id, &input.attachments).await?;
        Ok(())
    }
}

fn changes(input: InvoiceInput) -> invoices::ActiveModel {
    invoices::ActiveModel {
        customer_id: Set(input.customer_id),
        title: Set(input.title),
        date_issued: Set(input.date_issued),
        date_sent: Set(input.date_sent),
        date_paid: Set(input.date_paid),
        date_cancelled: Set(input.date_cancelled),
        due_date: Set(input.due_date),
        currency: Set(input.currency.into()),
        amount: Set(input.amount),
        general_tax_id: Set(input.general_tax_id),
        attachments: Set(dedup_attachments(input.attachments)),
        notes: Set(input.notes),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    }
}
