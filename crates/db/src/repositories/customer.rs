//! Customer repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use serde::Deserialize;

use super::references::ensure_not_blank;
use crate::entities::customers;
use crate::error::RepositoryError;

const ENTITY: &str = "Customer";

/// Customer fields set by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    /// Customer name as printed on invoices.
    pub name: String,
}

/// Customer repository.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer in the workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn create(
        &self,
        workspace_id: i64,
        input: CustomerInput,
    ) -> Result<customers::Model, RepositoryError> {
        ensure_not_blank("name", &input.name)?;

        let now = Utc::now().into();
        let customer = customers::ActiveModel {
            workspace_id: Set(workspace_id),
            name: Set(input.name),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let customer = customer.insert(&self.db).await?;
        tracing::info!(workspace_id, customer_id = customer.id, "Customer created");
        Ok(customer)
    }

    /// Lists customers of the workspace ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, workspace_id: i64) -> Result<Vec<customers::Model>, RepositoryError> {
        let customers = customers::Entity::find()
            .filter(customers::Column::WorkspaceId.eq(workspace_id))
            .order_by_asc(customers::Column::Name)
            .order_by_asc(customers::Column::Id)
            .all(&self.db)
            .await?;
        Ok(customers)
    }

    /// Gets a customer of the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if it does not exist in the workspace.
    pub async fn get(
        &self,
        workspace_id: i64,
        customer_id: i64,
    ) -> Result<customers::Model, RepositoryError> {
        customers::Entity::find_by_id(customer_id)
            .filter(customers::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::not_found(ENTITY, customer_id))
    }

    /// Renames a customer if `version` is current.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::StaleVersion`] on a version mismatch.
    pub async fn update(
        &self,
        workspace_id: i64,
        customer_id: i64,
        version: i64,
        input: CustomerInput,
    ) -> Result<customers::Model, RepositoryError> {
        ensure_not_blank("name", &input.name)?;

        let changes = customers::ActiveModel {
            name: Set(input.name),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let updated = customers::Entity::update_many()
            .set(changes)
            .col_expr(
                customers::Column::Version,
                Expr::col(customers::Column::Version).add(1),
            )
            .filter(customers::Column::Id.eq(customer_id))
            .filter(customers::Column::WorkspaceId.eq(workspace_id))
            .filter(customers::Column::Version.eq(version))
            .exec_with_returning(&self.db)
            .await?;

        if let Some(customer) = updated.into_iter().next() {
            return Ok(customer);
        }

        self.get(workspace_id, customer_id).await?;
        Err(RepositoryError::StaleVersion {
            entity: ENTITY,
            id: customer_id,
        })
    }
}
