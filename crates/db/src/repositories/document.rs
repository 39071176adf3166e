//! Document metadata repository.
//!
//! Only metadata lives here; document content is kept by the storage
//! service and never passes through this crate.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use super::references::{ensure_not_blank, ensure_not_negative};
use crate::entities::documents;
use crate::error::RepositoryError;

/// Metadata of an uploaded document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    /// File name.
    pub name: String,
    /// MIME type reported by the uploader.
    pub mime_type: String,
    /// Content size.
    pub size_in_bytes: i64,
}

/// Document repository.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers document metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the size is negative or the
    /// insert fails.
    pub async fn create(
        &self,
        workspace_id: i64,
        input: DocumentInput,
    ) -> Result<documents::Model, RepositoryError> {
        ensure_not_blank("name", &input.name)?;
        ensure_not_negative("sizeInBytes", input.size_in_bytes)?;

        let document = documents::ActiveModel {
            workspace_id: Set(workspace_id),
            name: Set(input.name),
            mime_type: Set(input.mime_type),
            size_in_bytes: Set(input.size_in_bytes),
            time_uploaded: Set(Utc::now().into()),
            version: Set(0),
            ..Default::default()
        };

        let document = document.insert(&self.db).await?;
        tracing::info!(
            workspace_id,
            document_id = document.id,
            size_in_bytes = document.size_in_bytes,
            "Document registered"
        );
        Ok(document)
    }

    /// Lists documents of the workspace, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, workspace_id: i64) -> Result<Vec<documents::Model>, RepositoryError> {
        let documents = documents::Entity::find()
            .filter(documents::Column::WorkspaceId.eq(workspace_id))
            .order_by_desc(documents::Column::TimeUploaded)
            .order_by_desc(documents::Column::Id)
            .all(&self.db)
            .await?;
        Ok(documents)
    }

    /// Gets a document of the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if it does not exist in the workspace.
    pub async fn get(
        &self,
        workspace_id: i64,
        document_id: i64,
    ) -> Result<documents::Model, RepositoryError> {
        documents::Entity::find_by_id(document_id)
            .filter(documents::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::not_found("Document", document_id))
    }
}
