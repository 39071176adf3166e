//! Document metadata routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use tally_db::{DocumentRepository, entities::documents, repositories::DocumentInput};

use super::owned_workspace;
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
};

/// Creates the document routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces/{workspace_id}/documents",
            get(list_documents).post(create_document),
        )
        .route(
            "/workspaces/{workspace_id}/documents/{document_id}",
            get(get_document),
        )
}

/// Document metadata as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    /// Document ID.
    pub id: i64,
    /// Optimistic locking version.
    pub version: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// File name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Content size.
    pub size_in_bytes: i64,
    /// Upload time.
    pub time_uploaded: DateTimeWithTimeZone,
}

impl From<documents::Model> for DocumentResponse {
    fn from(model: documents::Model) -> Self {
        Self {
            id: model.id,
            version: model.version,
            workspace_id: model.workspace_id,
            name: model.name,
            mime_type: model.mime_type,
            size_in_bytes: model.size_in_bytes,
            time_uploaded: model.time_uploaded,
        }
    }
}

async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
) -> Result<Json<Vec<DocumentResponse>>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let documents = DocumentRepository::new((*state.db).clone())
        .list(workspace.id)
        .await?;
    Ok(Json(documents.into_iter().map(Into::into).collect()))
}

/// POST `/workspaces/{workspace_id}/documents` - Register metadata of an uploaded document.
async fn create_document(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<DocumentInput>,
) -> Result<(StatusCode, Json<DocumentResponse>), ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let document = DocumentRepository::new((*state.db).clone())
        .create(workspace.id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(document.into())))
}

async fn get_document(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, document_id)): ApiPath<(i64, i64)>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let document = DocumentRepository::new((*state.db).clone())
        .get(workspace.id, document_id)
        .await?;
    Ok(Json(document.into()))
}
