//! Workspace routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tally_db::{WorkspaceRepository, entities::workspaces, repositories::WorkspaceInput};

use super::Versioned;
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
};

/// Creates the workspace routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workspaces", get(list_workspaces).post(create_workspace))
        .route(
            "/workspaces/{workspace_id}",
            get(get_workspace).put(update_workspace),
        )
}

/// Workspace as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceResponse {
    /// Workspace ID.
    pub id: i64,
    /// Optimistic locking version.
    pub version: i64,
    /// Owning user.
    pub owner_id: i64,
    /// Display name.
    pub name: String,
    /// Reporting currency.
    pub default_currency: String,
    /// Whether general taxes are enabled.
    pub tax_enabled: bool,
    /// Whether foreign currencies are enabled.
    pub multi_currency_enabled: bool,
}

impl From<workspaces::Model> for WorkspaceResponse {
    fn from(model: workspaces::Model) -> Self {
        Self {
            id: model.id,
            version: model.version,
            owner_id: model.owner_id,
            name: model.name,
            default_currency: model.default_currency,
            tax_enabled: model.tax_enabled,
            multi_currency_enabled: model.multi_currency_enabled,
        }
    }
}

/// GET `/workspaces` - List workspaces of the caller.
async fn list_workspaces(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<WorkspaceResponse>>, ApiError> {
    let workspaces = WorkspaceRepository::new((*state.db).clone())
        .list(auth.user_id())
        .await?;
    Ok(Json(workspaces.into_iter().map(Into::into).collect()))
}

/// POST `/workspaces` - Create a workspace owned by the caller.
async fn create_workspace(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<WorkspaceInput>,
) -> Result<(StatusCode, Json<WorkspaceResponse>), ApiError> {
    let workspace = WorkspaceRepository::new((*state.db).clone())
        .create(auth.user_id(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(workspace.into())))
}

/// GET `/workspaces/{workspace_id}` - Get a workspace.
async fn get_workspace(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
) -> Result<Json<WorkspaceResponse>, ApiError> {
    let workspace = super::owned_workspace(&state, &auth, workspace_id).await?;
    Ok(Json(workspace.into()))
}

/// PUT `/workspaces/{workspace_id}` - Replace workspace settings.
async fn update_workspace(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<Versioned<WorkspaceInput>>,
) -> Result<Json<WorkspaceResponse>, ApiError> {
    let workspace = WorkspaceRepository::new((*state.db).clone())
        .update(auth.user_id(), workspace_id, payload.version, payload.body)
        .await?;
    Ok(Json(workspace.into()))
}
