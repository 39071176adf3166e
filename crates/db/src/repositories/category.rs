//! Category repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use serde::Deserialize;

use super::references::ensure_not_blank;
use crate::entities::categories;
use crate::error::RepositoryError;

const ENTITY: &str = "Category";

/// Category fields set by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category applies to incomes.
    #[serde(default = "enabled")]
    pub income: bool,
    /// Category applies to expenses.
    #[serde(default = "enabled")]
    pub expense: bool,
}

const fn enabled() -> bool {
    true
}

/// Category repository.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category in the workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn create(
        &self,
        workspace_id: i64,
        input: CategoryInput,
    ) -> Result<categories::Model, RepositoryError> {
        ensure_not_blank("name", &input.name)?;

        let now = Utc::now().into();
        let category = categories::ActiveModel {
            workspace_id: Set(workspace_id),
            name: Set(input.name),
            description: Set(input.description),
            income: Set(input.income),
            expense: Set(input.expense),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let category = category.insert(&self.db).await?;
        tracing::info!(workspace_id, category_id = category.id, "Category created");
        Ok(category)
    }

    /// Lists categories of the workspace ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, workspace_id: i64) -> Result<Vec<categories::Model>, RepositoryError> {
        let categories = categories::Entity::find()
            .filter(categories::Column::WorkspaceId.eq(workspace_id))
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id)
            .all(&self.db)
            .await?;
        Ok(categories)
    }

    /// Gets a category of the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if it does not exist in the workspace.
    pub async fn get(
        &self,
        workspace_id: i64,
        category_id: i64,
    ) -> Result<categories::Model, RepositoryError> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::not_found(ENTITY, category_id))
    }

    /// Replaces a category if `version` is current.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::StaleVersion`] on a version mismatch.
    pub async fn update(
        &self,
        workspace_id: i64,
        category_id: i64,
        version: i64,
        input: CategoryInput,
    ) -> Result<categories::Model, RepositoryError> {
        ensure_not_blank("name", &input.name)?;

        let changes = categories::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            income: Set(input.income),
            expense: Set(input.expense),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let updated = categories::Entity::update_many()
            .set(changes)
            .col_expr(
                categories::Column::Version,
                Expr::col(categories::Column::Version).add(1),
            )
            .filter(categories::Column::Id.eq(category_id))
            .filter(categories::Column::WorkspaceId.eq(workspace_id))
            .filter(categories::Column::Version.eq(version))
            .exec_with_returning(&self.db)
            .await?;

        if let Some(category) = updated.into_iter().next() {
            return Ok(category);
        }

        self.get(workspace_id, category_id).await?;
        Err(RepositoryError::StaleVersion {
            entity: ENTITY,
            id: category_id,
        })
    }
}
