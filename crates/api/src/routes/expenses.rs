//! Expense routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::NaiveDate;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use tally_core::amounts::AmountsInDefaultCurrency;
use tally_core::status::AmountsStatus;
use tally_db::{ExpenseRepository, entities::expenses, repositories::ExpenseInput};
use tally_shared::types::{PageRequest, PageResponse};

use super::{Versioned, owned_workspace};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
};

/// Creates the expense routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces/{workspace_id}/expenses",
            get(list_expenses).post(create_expense),
        )
        .route(
            "/workspaces/{workspace_id}/expenses/{expense_id}",
            get(get_expense).put(update_expense),
        )
}

/// Expense as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    /// Expense ID.
    pub id: i64,
    /// Optimistic locking version.
    pub version: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Category, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// What was paid for.
    pub title: String,
    /// Payment date.
    pub date_paid: NaiveDate,
    /// When the expense was recorded.
    pub time_recorded: DateTimeWithTimeZone,
    /// Payment currency.
    pub currency: String,
    /// Amount in payment currency.
    pub original_amount: i64,
    /// Amounts at the bookkeeping exchange rate.
    pub converted_amounts: AmountsInDefaultCurrency,
    /// Amounts at the tax reporting exchange rate.
    pub income_taxable_amounts: AmountsInDefaultCurrency,
    /// Whether tax reporting uses its own exchange rate.
    pub use_different_exchange_rate_for_income_tax_purposes: bool,
    /// Business share in percent.
    pub percent_on_business: i32,
    /// General tax, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_tax_id: Option<i64>,
    /// Tax rate the amounts were calculated with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_tax_rate_in_bps: Option<i32>,
    /// General tax included in the amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_tax_amount: Option<i64>,
    /// Conversion status.
    pub status: AmountsStatus,
    /// Attached document ids.
    pub attachments: Vec<i64>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<expenses::Model> for ExpenseResponse {
    fn from(model: expenses::Model) -> Self {
        Self {
            id: model.id,
            version: model.version,
            workspace_id: model.workspace_id,
            category_id: model.category_id,
            title: model.title,
            date_paid: model.date_paid,
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
            percent_on_business: model.percent_on_business,
            general_tax_id: model.general_tax_id,
            general_tax_rate_in_bps: model.general_tax_rate_in_bps,
            general_tax_amount: model.general_tax_amount,
            status: model.status.into(),
            attachments: model.attachments,
            notes: model.notes,
        }
    }
}

/// GET `/workspaces/{workspace_id}/expenses` - List expenses page by page.
async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<PageResponse<ExpenseResponse>>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let expenses = ExpenseRepository::new((*state.db).clone())
        .list(workspace.id, &page)
        .await?;
    Ok(Json(expenses.map(Into::into)))
}

/// POST `/workspaces/{workspace_id}/expenses` - Record an expense.
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ExpenseInput>,
) -> Result<(StatusCode, Json<ExpenseResponse>), ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let expense = ExpenseRepository::new((*state.db).clone())
        .create(&workspace, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(expense.into())))
}

/// GET `/workspaces/{workspace_id}/expenses/{expense_id}` - Get an expense.
async fn get_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, expense_id)): ApiPath<(i64, i64)>,
) -> Result<Json<ExpenseResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let expense = ExpenseRepository::new((*state.db).clone())
        .get(workspace.id, expense_id)
        .await?;
    Ok(Json(expense.into()))
}

/// PUT `/workspaces/{workspace_id}/expenses/{expense_id}` - Replace an expense.
async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((workspace_id, expense_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<Versioned<ExpenseInput>>,
) -> Result<Json<ExpenseResponse>, ApiError> {
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let expense = ExpenseRepository::new((*state.db).clone())
        .update(&workspace, expense_id, payload.version, payload.body)
        .await?;
    Ok(Json(expense.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use tally_db::entities::sea_orm_active_enums;

    fn pending_expense() -> expenses::Model {
        expenses::Model {
            id: 5,
            workspace_id: 1,
            category_id: None,
            title: "Flight".to_string(),
            date_paid: NaiveDate::from_ymd_opt(3010, 4, 1).unwrap(),
            time_recorded: Utc::now().into(),
            currency: "USD".to_string(),
            original_amount: 30000,
            converted_original_amount: None,
            converted_adjusted_amount: None,
            income_taxable_original_amount: None,
            income_taxable_adjusted_amount: None,
            use_different_exchange_rate_for_income_tax_purposes: false,
            percent_on_business: 100,
            general_tax_id: None,
            general_tax_rate_in_bps: None,
            general_tax_amount: None,
            status: sea_orm_active_enums::AmountsStatus::PendingConversion,
            attachments: vec![],
            notes: None,
            version: 0,
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_pending_expense_omits_absent_fields() {
        let json = serde_json::to_value(ExpenseResponse::from(pending_expense())).unwrap();

        assert_eq!(json["convertedAmounts"], json!({}));
        assert_eq!(json["incomeTaxableAmounts"], json!({}));
        assert_eq!(json["status"], "PENDING_CONVERSION");
        assert_eq!(json["percentOnBusiness"], 100);
        assert!(json.get("categoryId").is_none());
        assert!(json.get("generalTaxAmount").is_none());
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_finalized_expense_amounts() {
        let model = expenses::Model {
            converted_original_amount: Some(42000),
            converted_adjusted_amount: Some(38182),
            income_taxable_original_amount: Some(42000),
            income_taxable_adjusted_amount: Some(38182),
            general_tax_id: Some(2),
            general_tax_rate_in_bps: Some(1000),
            general_tax_amount: Some(3818),
            status: sea_orm_active_enums::AmountsStatus::Finalized,
            ..pending_expense()
        };
        let json = serde_json::to_value(ExpenseResponse::from(model)).unwrap();

        assert_eq!(
            json["convertedAmounts"],
            json!({
                "originalAmountInDefaultCurrency": 42000,
                "adjustedAmountInDefaultCurrency": 38182
            })
        );
        assert_eq!(json["generalTaxAmount"], 3818);
        assert_eq!(json["status"], "FINALIZED");
    }
}
