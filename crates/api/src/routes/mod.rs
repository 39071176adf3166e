//! API route definitions.

use axum::{Router, middleware};
use serde::Deserialize;
use tally_db::{WorkspaceRepository, entities::workspaces as workspace_entity};

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::{AuthUser, auth_middleware};

pub mod categories;
pub mod customers;
pub mod documents;
pub mod expenses;
pub mod general_taxes;
pub mod health;
pub mod income_tax_payments;
pub mod incomes;
pub mod invoices;
pub mod statistics;
pub mod workspaces;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Everything except the health check requires a bearer token
    let protected_routes = Router::new()
        .merge(workspaces::routes())
        .merge(categories::routes())
        .merge(customers::routes())
        .merge(general_taxes::routes())
        .merge(documents::routes())
        .merge(expenses::routes())
        .merge(incomes::routes())
        .merge(invoices::routes())
        .merge(income_tax_payments::routes())
        .merge(statistics::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Full-record update body: the record fields plus the version they were read at.
#[derive(Debug, Deserialize)]
pub struct Versioned<T> {
    /// Version the client last saw.
    pub version: i64,
    /// Replacement fields.
    #[serde(flatten)]
    pub body: T,
}

/// Loads a workspace if the caller owns it.
///
/// Workspaces of other users are reported as not found.
pub(crate) async fn owned_workspace(
    state: &AppState,
    auth: &AuthUser,
    workspace_id: i64,
) -> Result<workspace_entity::Model, ApiError> {
    let workspace = WorkspaceRepository::new((*state.db).clone())
        .find_owned(auth.user_id(), workspace_id)
        .await?;
    Ok(workspace)
}
