//! Income tax payment routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::NaiveDate;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use tally_db::{
    IncomeTaxPaymentRepository, entities::income_tax_payments,
    repositories::IncomeTaxPaymentInput,
};

use super::{Versioned, owned_workspace};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
};

/// Creates the income tax payment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces/{workspace_id}/income-tax-payments",
            get(list_payments).post(create_payment),
        )
        .route(
            "/workspaces/{workspace_id}/income-tax-payments/{payment_id}",
            get(get_payment).put(update_payment),
        )
}

/// Income tax payment as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeTaxPaymentResponse {
    /// Payment ID.
    pub id: i64,
    /// Optimistic locking version.
    pub version: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Payment title.
    pub title: String,
    /// When the payment was recorded.
    pub time_recorded: DateTimeWithTimeZone,
    /// Date paid.
    pub date_paid: NaiveDate,
    /// Date the payment is reported for.
    pub reporting_date: NaiveDate,
    /// Paid amount in default currency.
    pub amount: i64,
    /// Attached document ids.
    pub attachments: Vec<i64>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<income_tax_payments::Model> for IncomeTaxPaymentResponse {
    fn from(model: income_tax_payments::Model) -> Self {
        Self {
            id: model.id,
            version: model.version,
            workspace_id: model.workspace_id,
            title: model.title,
            time_recorded: model.time_recorded,
            date_paid: model.date_paid,
            reporting_date: model.reporting_date,
            amount: model.amount,
            attachments: model.attachments,
            notes: model.notes,
        }
    }
}

async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
) -> Result<Json<Vec<IncomeTaxPaymentResponse>>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let payments = IncomeTaxPaymentRepository::new((*state.db).clone())
        .list(workspace.id)
        .await?;
    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<IncomeTaxPaymentInput>,
) -> Result<(StatusCode, Json<IncomeTaxPaymentResponse>), ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let payment = IncomeTaxPaymentRepository::new((*state.db).clone())
        .create(workspace.id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(payment.into())))
}

async fn get_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, payment_id)): ApiPath<(i64, i64)>,
) -> Result<Json<IncomeTaxPaymentResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let payment = IncomeTaxPaymentRepository::new((*state.db).clone())
        .get(workspace.id, payment_id)
        .await?;
    Ok(Json(payment.into()))
}

async fn update_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, payment_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<Versioned<IncomeTaxPaymentInput>>,
) -> Result<Json<IncomeTaxPaymentResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let payment = IncomeTaxPaymentRepository::new((*state.db).clone())
        .update(workspace.id, payment_id, payload.version, payload.body)
        .await?;
    Ok(Json(payment.into()))
}
