//! Statistics routes.

use axum::{Json, Router, extract::State, routing::get};
use chrono::NaiveDate;
use serde::Deserialize;
use tally_core::statistics::{AmountsStatistics, DateRange, IncomeTaxPaymentsStatistics};
use tally_db::{RepositoryError, StatisticsRepository};

use super::owned_workspace;
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiPath, ApiQuery},
    middleware::AuthUser,
};

/// Creates the statistics routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces/{workspace_id}/statistics/expenses",
            get(expense_statistics),
        )
        .route(
            "/workspaces/{workspace_id}/statistics/incomes",
            get(income_statistics),
        )
        .route(
            "/workspaces/{workspace_id}/statistics/income-tax-payments",
            get(income_tax_payment_statistics),
        )
}

/// Inclusive date range of a statistics request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    /// First day of the range.
    pub from_date: NaiveDate,
    /// Last day of the range.
    pub to_date: NaiveDate,
}

impl StatisticsQuery {
    fn range(&self) -> Result<DateRange, ApiError> {
        DateRange::new(self.from_date, self.to_date)
            .map_err(|e| ApiError::from(RepositoryError::from(e)))
    }
}

/// GET `/workspaces/{workspace_id}/statistics/expenses` - Expense totals by category.
async fn expense_statistics(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<StatisticsQuery>,
) -> Result<Json<AmountsStatistics>, ApiError> {
    let range = query.range()?;
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let statistics = StatisticsRepository::new((*state.db).clone())
        .expenses(workspace.id, range)
        .await?;
    Ok(Json(statistics))
}

/// GET `/workspaces/{workspace_id}/statistics/incomes` - Income totals by category.
async fn income_statistics(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<StatisticsQuery>,
) -> Result<Json<AmountsStatistics>, ApiError> {
    let range = query.range()?;
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let statistics = StatisticsRepository::new((*state.db).clone())
        .incomes(workspace.id, range)
        .await?;
    Ok(Json(statistics))
}

/// GET `/workspaces/{workspace_id}/statistics/income-tax-payments` - Tax paid for the period.
async fn income_tax_payment_statistics(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(workspace_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<StatisticsQuery>,
) -> Result<Json<IncomeTaxPaymentsStatistics>, ApiError> {
    let range = query.range()?;
    let workspace = owned_workspace(&state, &auth, workspace_id).await?;
    let statistics = StatisticsRepository::new((*state.db).clone())
        .income_tax_payments(workspace.id, range)
        .await?;
    Ok(Json(statistics))
}
