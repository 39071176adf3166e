//! Workspace repository.
//!
//! A workspace is visible only to its owner; lookups by anybody else report
//! the workspace as not found.
//!
//! Stored amounts are kept in the default currency, so the default currency
//! is fixed once the workspace has records, and multi-currency cannot be
//! switched off while records in other currencies exist.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, sea_query::Expr,
};
use serde::Deserialize;
use tally_shared::types::CurrencyCode;

use super::references::ensure_not_blank;
use crate::entities::{expenses, income_tax_payments, incomes, invoices, workspaces};
use crate::error::RepositoryError;

const ENTITY: &str = "Workspace";

/// Fields of a workspace that the owner can set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceInput {
    /// Display name.
    pub name: String,
    /// Currency all amounts are reported in.
    pub default_currency: CurrencyCode,
    /// Whether records may carry a general tax.
    #[serde(default)]
    pub tax_enabled: bool,
    /// Whether records may use currencies other than the default one.
    #[serde(default)]
    pub multi_currency_enabled: bool,
}

/// Workspace repository.
#[derive(Debug, Clone)]
pub struct WorkspaceRepository {
    db: DatabaseConnection,
}

impl WorkspaceRepository {
    /// Creates a new workspace repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a workspace owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn create(
        &self,
        owner_id: i64,
        input: WorkspaceInput,
    ) -> Result<workspaces::Model, RepositoryError> {
        ensure_not_blank("name", &input.name)?;

        let now = Utc::now().into();
        let workspace = workspaces::ActiveModel {
            owner_id: Set(owner_id),
            name: Set(input.name),
            default_currency: Set(input.default_currency.into()),
            tax_enabled: Set(input.tax_enabled),
            multi_currency_enabled: Set(input.multi_currency_enabled),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let workspace = workspace.insert(&self.db).await?;
        tracing::info!(workspace_id = workspace.id, owner_id, "Workspace created");
        Ok(workspace)
    }

    /// Lists workspaces of an owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, owner_id: i64) -> Result<Vec<workspaces::Model>, RepositoryError> {
        let workspaces = workspaces::Entity::find()
            .filter(workspaces::Column::OwnerId.eq(owner_id))
            .order_by_asc(workspaces::Column::Id)
            .all(&self.db)
            .await?;
        Ok(workspaces)
    }

    /// Finds a workspace visible to `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the workspace does not exist
    /// or belongs to another owner.
    pub async fn find_owned(
        &self,
        owner_id: i64,
        workspace_id: i64,
    ) -> Result<workspaces::Model, RepositoryError> {
        workspaces::Entity::find_by_id(workspace_id)
            .filter(workspaces::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::not_found(ENTITY, workspace_id))
    }

    /// Replaces the workspace settings if `version` is current.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Validation`] if the default currency changes
    /// while the workspace has records, or multi-currency is switched off while
    /// records in other currencies exist. Returns
    /// [`RepositoryError::StaleVersion`] if the workspace changed since
    /// `version` was read.
    pub async fn update(
        &self,
        owner_id: i64,
        workspace_id: i64,
        version: i64,
        input: WorkspaceInput,
    ) -> Result<workspaces::Model, RepositoryError> {
        ensure_not_blank("name", &input.name)?;

        let current = self.find_owned(owner_id, workspace_id).await?;
        let default_currency = input.default_currency.as_str();
        if current.default_currency != default_currency && self.has_records(workspace_id).await? {
            return Err(RepositoryError::Validation(format!(
                "Default currency of workspace {workspace_id} cannot be changed from {} to {default_currency} once it has records",
                current.default_currency
            )));
        }
        if !input.multi_currency_enabled
            && self
                .has_records_in_other_currencies(workspace_id, default_currency)
                .await?
        {
            return Err(RepositoryError::Validation(format!(
                "Multi-currency cannot be disabled for workspace {workspace_id}: it has records in currencies other than {default_currency}"
            )));
        }

        let changes = workspaces::ActiveModel {
            name: Set(input.name),
            default_currency: Set(input.default_currency.into()),
            tax_enabled: Set(input.tax_enabled),
            multi_currency_enabled: Set(input.multi_currency_enabled),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let updated = workspaces::Entity::update_many()
            .set(changes)
            .col_expr(
                workspaces::Column::Version,
                Expr::col(workspaces::Column::Version).add(1),
            )
            .filter(workspaces::Column::Id.eq(workspace_id))
            .filter(workspaces::Column::OwnerId.eq(owner_id))
            .filter(workspaces::Column::Version.eq(version))
            .exec_with_returning(&self.db)
            .await?;

        match updated.into_iter().next() {
            Some(workspace) => {
                tracing::info!(workspace_id, version = workspace.version, "Workspace updated");
                Ok(workspace)
            }
            None => {
                self.find_owned(owner_id, workspace_id).await?;
                Err(RepositoryError::StaleVersion {
                    entity: ENTITY,
                    id: workspace_id,
                })
            }
        }
    }

    async fn has_records(&self, workspace_id: i64) -> Result<bool, RepositoryError> {
        let counts = [
            expenses::Entity::find()
                .filter(expenses::Column::WorkspaceId.eq(workspace_id))
                .count(&self.db)
                .await?,
            incomes::Entity::find()
                .filter(incomes::Column::WorkspaceId.eq(workspace_id))
                .count(&self.db)
                .await?,
            invoices::Entity::find()
                .filter(invoices::Column::WorkspaceId.eq(workspace_id))
                .count(&self.db)
                .await?,
            income_tax_payments::Entity::find()
                .filter(income_tax_payments::Column::WorkspaceId.eq(workspace_id))
                .count(&self.db)
                .await?,
        ];
        Ok(counts.iter().any(|&count| count > 0))
    }

    async fn has_records_in_other_currencies(
        &self,
        workspace_id: i64,
        currency: &str,
    ) -> Result<bool, RepositoryError> {
        let counts = [
            expenses::Entity::find()
                .filter(expenses::Column::WorkspaceId.eq(workspace_id))
                .filter(expenses::Column::Currency.ne(currency))
                .count(&self.db)
                .await?,
            incomes::Entity::find()
                .filter(incomes::Column::WorkspaceId.eq(workspace_id))
                .filter(incomes::Column::Currency.ne(currency))
                .count(&self.db)
                .await?,
            invoices::Entity::find()
                .filter(invoices::Column::WorkspaceId.eq(workspace_id))
                .filter(invoices::Column::Currency.ne(currency))
                .count(&self.db)
                .await?,
        ];
        Ok(counts.iter().any(|&count| count > 0))
    }
}
