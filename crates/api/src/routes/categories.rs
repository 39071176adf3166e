//! Category routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tally_db::{CategoryRepository, entities::categories, repositories::CategoryInput};

use super::{Versioned, owned_workspace};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
};

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces/{workspace_id}/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/workspaces/{workspace_id}/categories/{category_id}",
            get(get_category).put(update_category),
        )
}

/// Category as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    /// Category ID.
    pub id: i64,
    /// Optimistic locking version.
    pub version: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Applies to incomes.
    pub income: bool,
    /// Applies to expenses.
    pub expense: bool,
}

impl From<categories::Model> for CategoryResponse {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            version: model.version,
            workspace_id: model.workspace_id,
            name: model.name,
            description: model.description,
            income: model.income,
            expense: model.expense,
        }
    }
}

async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let categories = CategoryRepository::new((*state.db).clone())
        .list(workspace.id)
        .await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<CategoryInput>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let category = CategoryRepository::new((*state.db).clone())
        .create(workspace.id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, category_id)): ApiPath<(i64, i64)>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let category = CategoryRepository::new((*state.db).clone())
        .get(workspace.id, category_id)
        .await?;
    Ok(Json(category.into()))
}

async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, category_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<Versioned<CategoryInput>>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let category = CategoryRepository::new((*state.db).clone())
        .update(workspace.id, category_id, payload.version, payload.body)
        .await?;
    Ok(Json(category.into()))
}
