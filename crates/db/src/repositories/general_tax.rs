//! General tax repository.
//!
//! The rate of a tax is copied onto expenses and incomes when they are
//! calculated, so changing it later does not rewrite existing records.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use serde::Deserialize;
use tally_core::amounts::calculator::validate_tax_rate;

use super::references::ensure_not_blank;
use crate::entities::general_taxes;
use crate::error::RepositoryError;

const ENTITY: &str = "General tax";

/// General tax fields set by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralTaxInput {
    /// Display title, e.g. "VAT 10%".
    pub title: String,
    /// Rate in basis points, 0..=10000.
    pub rate_in_bps: i32,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl GeneralTaxInput {
    fn validate(&self) -> Result<(), RepositoryError> {
        ensure_not_blank("title", &self.title)?;
        validate_tax_rate(self.rate_in_bps)?;
        Ok(())
    }
}

/// General tax repository.
#[derive(Debug, Clone)]
pub struct GeneralTaxRepository {
    db: DatabaseConnection,
}

impl GeneralTaxRepository {
    /// Creates a new general tax repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a general tax in the workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank, the rate is out of range or
    /// the insert fails.
    pub async fn create(
        &self,
        workspace_id: i64,
        input: GeneralTaxInput,
    ) -> Result<general_taxes::Model, RepositoryError> {
        input.validate()?;

        let now = Utc::now().into();
        let tax = general_taxes::ActiveModel {
            workspace_id: Set(workspace_id),
            title: Set(input.title),
            rate_in_bps: Set(input.rate_in_bps),
            description: Set(input.description),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let tax = tax.insert(&self.db).await?;
        tracing::info!(
            workspace_id,
            general_tax_id = tax.id,
            rate_in_bps = tax.rate_in_bps,
            "General tax created"
        );
        Ok(tax)
    }

    /// Lists general taxes of the workspace ordered by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        workspace_id: i64,
    ) -> Result<Vec<general_taxes::Model>, RepositoryError> {
        let taxes = general_taxes::Entity::find()
            .filter(general_taxes::Column::WorkspaceId.eq(workspace_id))
            .order_by_asc(general_taxes::Column::Title)
            .order_by_asc(general_taxes::Column::Id)
            .all(&self.db)
            .await?;
        Ok(taxes)
    }

    /// Gets a general tax of the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if it does not exist in the workspace.
    pub async fn get(
        &self,
        workspace_id: i64,
        tax_id: i64,
    ) -> Result<general_taxes::Model, RepositoryError> {
        general_taxes::Entity::find_by_id(tax_id)
            .filter(general_taxes::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::not_found(ENTITY, tax_id))
    }

    /// Replaces a general tax if `version` is current.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::StaleVersion`] on a version mismatch.
    pub async fn update(
        &self,
        workspace_id: i64,
        tax_id: i64,
        version: i64,
        input: GeneralTaxInput,
    ) -> Result<general_taxes::Model, RepositoryError> {
        input.validate()?;

        let changes = general_taxes::ActiveModel {
            title: Set(input.title),
            rate_in_bps: Set(input.rate_in_bps),
            description: Set(input.description),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let updated = general_taxes::Entity::update_many()
            .set(changes)
            .col_expr(
                general_taxes::Column::Version,
                Expr::col(general_taxes::Column::Version).add(1),
            )
            .filter(general_taxes::Column::Id.eq(tax_id))
            .filter(general_taxes::Column::WorkspaceId.eq(workspace_id))
            .filter(general_taxes::Column::Version.eq(version))
            .exec_with_returning(&self.db)
            .await?;

        if let Some(tax) = updated.into_iter().next() {
            return Ok(tax);
        }

        self.get(workspace_id, tax_id).await?;
        Err(RepositoryError::StaleVersion {
            entity: ENTITY,
            id: tax_id,
        })
    }
}
