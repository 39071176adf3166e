//! Invoice routes.
//!
//! Invoice status depends on the current date and is derived on every read.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::{NaiveDate, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use tally_core::status::InvoiceStatus;
use tally_db::{
    InvoiceRepository,
    entities::invoices,
    repositories::{InvoiceInput, invoice_dates},
};
use tally_shared::types::{PageRequest, PageResponse};

use super::{Versioned, owned_workspace};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
};

/// Creates the invoice routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces/{workspace_id}/invoices",
            get(list_invoices).post(create_invoice),
        )
        .route(
            "/workspaces/{workspace_id}/invoices/{invoice_id}",
            get(get_invoice).put(update_invoice),
        )
}

/// Invoice as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    /// Invoice ID.
    pub id: i64,
    /// Optimistic locking version.
    pub version: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Billed customer.
    pub customer_id: i64,
    /// Invoice title.
    pub title: String,
    /// When the invoice was recorded.
    pub time_recorded: DateTimeWithTimeZone,
    /// Issue date.
    pub date_issued: NaiveDate,
    /// Date sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_sent: Option<NaiveDate>,
    /// Date paid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_paid: Option<NaiveDate>,
    /// Date cancelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_cancelled: Option<NaiveDate>,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Invoice currency.
    pub currency: String,
    /// Billed amount.
    pub amount: i64,
    /// General tax, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_tax_id: Option<i64>,
    /// Status as of today.
    pub status: InvoiceStatus,
    /// Attached document ids.
    pub attachments: Vec<i64>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InvoiceResponse {
    /// Builds the response with the status as of `today`.
    #[must_use]
    pub fn new(model: invoices::Model, today: NaiveDate) -> Self {
        let status = InvoiceStatus::derive(&invoice_dates(&model), today);
        Self {
            id: model.id,
            version: model.version,
            workspace_id: model.workspace_id,
            customer_id: model.customer_id,
            title: model.title,
            time_recorded: model.time_recorded,
            date_issued: model.date_issued,
            date_sent: model.date_sent,
            date_paid: model.date_paid,
            date_cancelled: model.date_cancelled,
            due_date: model.due_date,
            currency: model.currency,
            amount: model.amount,
            general_tax_id: model.general_tax_id,
            status,
            attachments: model.attachments,
            notes: model.notes,
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// GET `/workspaces/{workspace_id}/invoices` - List invoices page by page.
async fn list_invoices(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<PageResponse<InvoiceResponse>>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let invoices = InvoiceRepository::new((*state.db).clone())
        .list(workspace.id, &page)
        .await?;
    let today = today();
    Ok(Json(invoices.map(|invoice| InvoiceResponse::new(invoice, today))))
}

/// POST `/workspaces/{workspace_id}/invoices` - Create an invoice.
async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<InvoiceInput>,
) -> Result<(StatusCode, Json<InvoiceResponse>), ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let invoice = InvoiceRepository::new((*state.db).clone())
        .create(&workspace, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(InvoiceResponse::new(invoice, today()))))
}

/// GET `/workspaces/{workspace_id}/invoices/{invoice_id}` - Get an invoice.
async fn get_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, invoice_id)): ApiPath<(i64, i64)>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let invoice = InvoiceRepository::new((*state.db).clone())
        .get(workspace.id, invoice_id)
        .await?;
    Ok(Json(InvoiceResponse::new(invoice, today())))
}

/// PUT `/workspaces/{workspace_id}/invoices/{invoice_id}` - Replace an invoice.
async fn update_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, invoice_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<Versioned<InvoiceInput>>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let invoice = InvoiceRepository::new((*state.db).clone())
        .update(&workspace, invoice_id, payload.version, payload.body)
        .await?;
    Ok(Json(InvoiceResponse::new(invoice, today())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(3010, month, day).unwrap()
    }

    fn invoice() -> invoices::Model {
        invoices::Model {
            id: 9,
            workspace_id: 1,
            customer_id: 4,
            title: "Website redesign".to_string(),
            time_recorded: Utc::now().into(),
            date_issued: date(5, 1),
            date_sent: None,
            date_paid: None,
            date_cancelled: None,
            due_date: date(5, 31),
            currency: "EUR".to_string(),
            amount: 150_000,
            general_tax_id: None,
            attachments: vec![3],
            notes: None,
            version: 2,
            updated_at: Utc::now().into(),
        }
    }

    #[rstest]
    #[case(invoice(), date(5, 10), "DRAFT")]
    #[case(invoices::Model { date_sent: Some(date(5, 2)), ..invoice() }, date(5, 10), "SENT")]
    #[case(invoices::Model { date_sent: Some(date(5, 2)), ..invoice() }, date(6, 1), "OVERDUE")]
    #[case(invoices::Model { date_paid: Some(date(6, 3)), ..invoice() }, date(6, 10), "PAID")]
    #[case(
        invoices::Model { date_paid: Some(date(5, 3)), date_cancelled: Some(date(5, 4)), ..invoice() },
        date(5, 10),
        "CANCELLED"
    )]
    fn test_status_derived_at_read_time(
        #[case] model: invoices::Model,
        #[case] today: NaiveDate,
        #[case] expected: &str,
    ) {
        let json = serde_json::to_value(InvoiceResponse::new(model, today)).unwrap();
        assert_eq!(json["status"], expected);
    }

    #[test]
    fn test_invoice_json_shape() {
        let json = serde_json::to_value(InvoiceResponse::new(invoice(), date(5, 10))).unwrap();

        assert_eq!(json["customerId"], 4);
        assert_eq!(json["dateIssued"], "3010-05-01");
        assert_eq!(json["dueDate"], "3010-05-31");
        assert_eq!(json["attachments"], serde_json::json!([3]));
        assert!(json.get("dateSent").is_none());
        assert!(json.get("generalTaxId").is_none());
    }
}
