use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;
use service::domain::{Analytics, NewAnalytics};
use service::insights::{self, MonthlyRevenue, StatusCount};
use service::pagination::MonthsWindow;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RevenueQuery {
    pub months: Option<u32>,
}

#[utoipa::path(get, path = "/api/analytics", tag = "analytics",
    responses((status = 200, description = "Latest snapshot"), (status = 404, description = "No snapshot recorded yet")))]
pub async fn latest(State(state): State<AppState>) -> Result<Json<Analytics>, JsonApiError> {
    state.store.latest_analytics().await?.map(Json).ok_or_else(|| JsonApiError::not_found("Analytics"))
}

#[utoipa::path(get, path = "/api/analytics/history", tag = "analytics", responses((status = 200, description = "All snapshots, newest first")))]
pub async fn history(State(state): State<AppState>) -> Result<Json<Vec<Analytics>>, JsonApiError> {
    Ok(Json(state.store.list_analytics().await?))
}

#[utoipa::path(post, path = "/api/analytics", tag = "analytics",
    responses((status = 201, description = "Created"), (status = 400, description = "Invalid analytics data")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewAnalytics>,
) -> Result<(StatusCode, Json<Analytics>), JsonApiError> {
    input.validate()?;
    Ok((StatusCode::CREATED, Json(state.store.create_analytics(input).await?)))
}

#[utoipa::path(post, path = "/api/analytics/snapshot", tag = "analytics", responses((status = 201, description = "Snapshot of current totals")))]
pub async fn snapshot(State(state): State<AppState>) -> Result<(StatusCode, Json<Analytics>), JsonApiError> {
    let snap = insights::capture_snapshot(&*state.store).await?;
    Ok((StatusCode::CREATED, Json(snap)))
}

#[utoipa::path(get, path = "/api/analytics/job-status", tag = "analytics", responses((status = 200, description = "Job counts per status")))]
pub async fn job_status(State(state): State<AppState>) -> Result<Json<Vec<StatusCount>>, JsonApiError> {
    Ok(Json(insights::job_status_breakdown(&*state.store).await?))
}

#[utoipa::path(get, path = "/api/analytics/revenue", tag = "analytics", params(("months" = Option<u32>, Query, description = "1..=24, default 6")),
    responses((status = 200, description = "Completed-job revenue per month"), (status = 400, description = "months out of range")))]
pub async fn revenue(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<RevenueQuery>,
) -> Result<Json<Vec<MonthlyRevenue>>, JsonApiError> {
    let months = MonthsWindow { months: q.months }.validate()?;
    Ok(Json(insights::monthly_revenue(&*state.store, months, Utc::now()).await?))
}
