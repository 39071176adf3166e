//! General tax routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tally_db::{GeneralTaxRepository, entities::general_taxes, repositories::GeneralTaxInput};

use super::{Versioned, owned_workspace};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
};

/// Creates the general tax routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces/{workspace_id}/general-taxes",
            get(list_general_taxes).post(create_general_tax),
        )
        .route(
            "/workspaces/{workspace_id}/general-taxes/{tax_id}",
            get(get_general_tax).put(update_general_tax),
        )
}

/// General tax as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralTaxResponse {
    /// General tax ID.
    pub id: i64,
    /// Optimistic locking version.
    pub version: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Display title.
    pub title: String,
    /// Rate in basis points.
    pub rate_in_bps: i32,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<general_taxes::Model> for GeneralTaxResponse {
    fn from(model: general_taxes::Model) -> Self {
        Self {
            id: model.id,
            version: model.version,
            workspace_id: model.workspace_id,
            title: model.title,
            rate_in_bps: model.rate_in_bps,
            description: model.description,
        }
    }
}

async fn list_general_taxes(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
) -> Result<Json<Vec<GeneralTaxResponse>>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let taxes = GeneralTaxRepository::new((*state.db).clone())
        .list(workspace.id)
        .await?;
    Ok(Json(taxes.into_iter().map(Into::into).collect()))
}

async fn create_general_tax(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<GeneralTaxInput>,
) -> Result<(StatusCode, Json<GeneralTaxResponse>), ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let tax = GeneralTaxRepository::new((*state.db).clone())
        .create(workspace.id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(tax.into())))
}

async fn get_general_tax(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, tax_id)): ApiPath<(i64, i64)>,
) -> Result<Json<GeneralTaxResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let tax = GeneralTaxRepository::new((*state.db).clone())
        .get(workspace.id, tax_id)
        .await?;
    Ok(Json(tax.into()))
}

async fn update_general_tax(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, tax_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<Versioned<GeneralTaxInput>>,
) -> Result<Json<GeneralTaxResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let tax = GeneralTaxRepository::new((*state.db).clone())
        .update(workspace.id, tax_id, payload.version, payload.body)
        .await?;
    Ok(Json(tax.into()))
}
