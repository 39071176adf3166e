//! Income routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::NaiveDate;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use tally_core::amounts::AmountsInDefaultCurrency;
use tally_core::status::AmountsStatus;
use tally_db::{IncomeRepository, entities::incomes, repositories::IncomeInput};
use tally_shared::types::{PageRequest, PageResponse};

use super::{Versioned, owned_workspace};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
};

/// Creates the income routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces/{workspace_id}/incomes",
            get(list_incomes).post(create_income),
        )
        .route(
            "/workspaces/{workspace_id}/incomes/{income_id}",
            get(get_income).put(update_income),
        )
}

/// Income as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeResponse {
    /// Income ID.
    pub id: i64,
    /// Optimistic locking version.
    pub version: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Category, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// What was received for.
    pub title: String,
    /// Date the money was received.
    pub date_received: NaiveDate,
    /// When the income was recorded.
    pub time_recorded: DateTimeWithTimeZone,
    /// Currency the income was received in.
    pub currency: String,
    /// Amount in the received currency.
    pub original_amount: i64,
    /// Amounts at the bookkeeping exchange rate.
    pub converted_amounts: AmountsInDefaultCurrency,
    /// Amounts at the tax reporting exchange rate.
    pub income_taxable_amounts: AmountsInDefaultCurrency,
    /// Whether tax reporting uses its own exchange rate.
    pub use_different_exchange_rate_for_income_tax_purposes: bool,
    /// General tax, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_tax_id: Option<i64>,
    /// Tax rate the amounts were calculated with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_tax_rate_in_bps: Option<i32>,
    /// General tax included in the amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_tax_amount: Option<i64>,
    /// Invoice this income settles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_invoice_id: Option<i64>,
    /// Conversion status.
    pub status: AmountsStatus,
    /// Attached document ids.
    pub attachments: Vec<i64>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<incomes::Model> for IncomeResponse {
    fn from(model: incomes::Model) -> Self {
        Self {
            id: model.id,
            version: model.version,
            workspace_id: model.workspace_id,
            category_id: model.category_id,
            title: model.title,
            date_received: model.date_received,
            time_recorded: model.time_recorded,
            currency: model.currency,
            original_amount: model.original_amount,
            converted_amounts: AmountsInDefaultCurrency {
                original_amount_in_default_currency: model.converted_original_amount,
                adjusted_amount_in_default_currency: model.converted_adjusted_amount,
            },
            income_taxable_amounts: AmountsInDefaultCurrency {
                original_amount_in_default_currency: model.income_taxable_original_amount,
                adjusted_amount_in_default_currency: model.income_taxable_adjusted_amount,
            },
            use_different_exchange_rate_for_income_tax_purposes: model
                .use_different_exchange_rate_for_income_tax_purposes,
            general_tax_id: model.general_tax_id,
            general_tax_rate_in_bps: model.general_tax_rate_in_bps,
            general_tax_amount: model.general_tax_amount,
            linked_invoice_id: model.linked_invoice_id,
            status: model.status.into(),
            attachments: model.attachments,
            notes: model.notes,
        }
    }
}

/// GET `/workspaces/{workspace_id}/incomes` - List incomes page by page.
async fn list_incomes(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<PageResponse<IncomeResponse>>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let incomes = IncomeRepository::new((*state.db).clone())
        .list(workspace.id, &page)
        .await?;
    Ok(Json(incomes.map(Into::into)))
}

/// POST `/workspaces/{workspace_id}/incomes` - Record an income.
async fn create_income(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<IncomeInput>,
) -> Result<(StatusCode, Json<IncomeResponse>), ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let income = IncomeRepository::new((*state.db).clone())
        .create(&workspace, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(income.into())))
}

/// GET `/workspaces/{workspace_id}/incomes/{income_id}` - Get an income.
async fn get_income(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, income_id)): ApiPath<(i64, i64)>,
) -> Result<Json<IncomeResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let income = IncomeRepository::new((*state.db).clone())
        .get(workspace.id, income_id)
        .await?;
    Ok(Json(income.into()))
}

/// PUT `/workspaces/{workspace_id}/incomes/{income_id}` - Replace an income.
async fn update_income(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, income_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<Versioned<IncomeInput>>,
) -> Result<Json<IncomeResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let income = IncomeRepository::new((*state.db).clone())
        .update(&workspace, income_id, payload.version, payload.body)
        .await?;
    Ok(Json(income.into()))
}
