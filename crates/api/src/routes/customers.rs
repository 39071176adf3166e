//! Customer routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tally_db::{CustomerRepository, entities::customers, repositories::CustomerInput};

use super::{Versioned, owned_workspace};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
};

/// Creates the customer routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces/{workspace_id}/customers",
            get(list_customers).post(create_customer),
        )
        .route(
            "/workspaces/{workspace_id}/customers/{customer_id}",
            get(get_customer).put(update_customer),
        )
}

/// Customer as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    /// Customer ID.
    pub id: i64,
    /// Optimistic locking version.
    pub version: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Customer name.
    pub name: String,
}

impl From<customers::Model> for CustomerResponse {
    fn from(model: customers::Model) -> Self {
        Self {
            id: model.id,
            version: model.version,
            workspace_id: model.workspace_id,
            name: model.name,
        }
    }
}

async fn list_customers(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let customers = CustomerRepository::new((*state.db).clone())
        .list(workspace.id)
        .await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

async fn create_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<CustomerInput>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let customer = CustomerRepository::new((*state.db).clone())
        .create(workspace.id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

async fn get_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, customer_id)): ApiPath<(i64, i64)>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let customer = CustomerRepository::new((*state.db).clone())
        .get(workspace.id, customer_id)
        .await?;
    Ok(Json(customer.into()))
}

async fn update_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, customer_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<Versioned<CustomerInput>>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let customer = CustomerRepository::new((*state.db).clone())
        .update(workspace.id, customer_id, payload.version, payload.body)
        .await?;
    Ok(Json(customer.into()))
}
