//! Income tax payment repository.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use serde::Deserialize;
use tally_shared::types::MinorUnits;

use super::references::{dedup_attachments, ensure_documents, ensure_not_blank, ensure_not_negative};
use crate::entities::income_tax_payments;
use crate::error::RepositoryError;

const ENTITY: &str = "Income tax payment";

/// Income tax payment fields set by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeTaxPaymentInput {
    /// Payment title.
    pub title: String,
    /// Date the tax was paid.
    pub date_paid: NaiveDate,
    /// Date the payment is reported for; statistics group by this date.
    pub reporting_date: NaiveDate,
    /// Paid amount in default currency.
    pub amount: MinorUnits,
    /// Attached document ids.
    #[serde(default)]
    pub attachments: Vec<i64>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Income tax payment repository.
#[derive(Debug, Clone)]
pub struct IncomeTaxPaymentRepository {
    db: DatabaseConnection,
}

impl IncomeTaxPaymentRepository {
    /// Creates a new income tax payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an income tax payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank, the amount is negative, an
    /// attachment does not exist or the insert fails.
    pub async fn create(
        &self,
        workspace_id: i64,
        input: IncomeTaxPaymentInput,
    ) -> Result<income_tax_payments::Model, RepositoryError> {
        self.validate(workspace_id, &input).await?;

        let mut payment = changes(input);
        payment.workspace_id = Set(workspace_id);
        payment.time_recorded = Set(Utc::now().into());
        payment.version = Set(0);

        let payment = payment.insert(&self.db).await?;
        tracing::info!(
            workspace_id,
            income_tax_payment_id = payment.id,
            amount = payment.amount,
            "Income tax payment created"
        );
        Ok(payment)
    }

    /// Lists income tax payments of the workspace, latest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        workspace_id: i64,
    ) -> Result<Vec<income_tax_payments::Model>, RepositoryError> {
        let payments = income_tax_payments::Entity::find()
            .filter(income_tax_payments::Column::WorkspaceId.eq(workspace_id))
            .order_by_desc(income_tax_payments::Column::DatePaid)
            .order_by_desc(income_tax_payments::Column::Id)
            .all(&self.db)
            .await?;
        Ok(payments)
    }

    /// Gets an income tax payment of the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if it does not exist in the workspace.
    pub async fn get(
        &self,
        workspace_id: i64,
        payment_id: i64,
    ) -> Result<income_tax_payments::Model, RepositoryError> {
        income_tax_payments::Entity::find_by_id(payment_id)
            .filter(income_tax_payments::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::not_found(ENTITY, payment_id))
    }

    /// Replaces an income tax payment if `version` is current.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`], plus [`RepositoryError::StaleVersion`] on a
    /// version mismatch.
    pub async fn update(
        &self,
        workspace_id: i64,
        payment_id: i64,
        version: i64,
        input: IncomeTaxPaymentInput,
    ) -> Result<income_tax_payments::Model, RepositoryError> {
        self.validate(workspace_id, &input).await?;

        let updated = income_tax_payments::Entity::update_many()
            .set(changes(input))
            .col_expr(
                income_tax_payments::Column::Version,
                Expr::col(income_tax_payments::Column::Version).add(1),
            )
            .filter(income_tax_payments::Column::Id.eq(payment_id))
            .filter(income_tax_payments::Column::WorkspaceId.eq(workspace_id))
            .filter(income_tax_payments::Column::Version.eq(version))
            .exec_with_returning(&self.db)
            .await?;

        if let Some(payment) = updated.into_iter().next() {
            return Ok(payment);
        }

        self.get(workspace_id, payment_id).await?;
        Err(RepositoryError::StaleVersion {
            entity: ENTITY,
            id: payment_id,
        })
    }

    async fn validate(
        &self,
        workspace_id: i64,
        input: &IncomeTaxPaymentInput,
    ) -> Result<(), RepositoryError> {
        ensure_not_blank("title", &input.title)?;
        ensure_not_negative("amount", input.amount)?;
        ensure_documents(&self.db, workspace_id, &input.attachments).await
    }
}

fn changes(input: IncomeTaxPaymentInput) -> income_tax_payments::ActiveModel {
    income_tax_payments::ActiveModel {
        title: Set(input.title),
        date_paid: Set(input.date_paid),
        reporting_date: Set(input.reporting_date),
        amount: Set(input.amount),
        attachments: Set(dedup_attachments(input.attachments)),
        notes: Set(input.notes),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    }
}
