use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use service::domain::{Job, JobStatus, JobUpdate, NewJob};
use service::pagination::RecentLimit;
use tracing::info;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

#[utoipa::path(get, path = "/api/jobs", tag = "jobs", params(("status" = Option<String>, Query, description = "Only jobs in this status")),
    responses((status = 200, description = "Jobs, newest first"), (status = 400, description = "Unknown status")))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<JobFilter>,
) -> Result<Json<Vec<Job>>, JsonApiError> {
    let jobs = match filter.status {
        Some(status) => state.store.jobs_by_status(status).await?,
        None => state.store.list_jobs().await?,
    };
    Ok(Json(jobs))
}

#[utoipa::path(get, path = "/api/jobs/recent", tag = "jobs", params(("limit" = Option<u32>, Query, description = "1..=100, default 10")),
    responses((status = 200, description = "Most recent jobs")))]
pub async fn recent(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<RecentQuery>,
) -> Result<Json<Vec<Job>>, JsonApiError> {
    let limit = RecentLimit { limit: q.limit }.normalize();
    Ok(Json(state.store.recent_jobs(limit).await?))
}

#[utoipa::path(get, path = "/api/jobs/{id}", tag = "jobs", params(("id" = i32, Path, description = "Job id")),
    responses((status = 200, description = "Job"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Job>, JsonApiError> {
    state.store.get_job(id).await?.map(Json).ok_or_else(|| JsonApiError::not_found("Job"))
}

#[utoipa::path(post, path = "/api/jobs", tag = "jobs",
    responses((status = 201, description = "Created"), (status = 400, description = "Invalid job data")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewJob>,
) -> Result<(StatusCode, Json<Job>), JsonApiError> {
    input.validate()?;
    let job = state.store.create_job(input).await?;
    info!(job_id = job.id, requester_id = job.requester_id, price = %job.price, "job created");
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(put, path = "/api/jobs/{id}", tag = "jobs", params(("id" = i32, Path, description = "Job id")),
    responses((status = 200, description = "Updated"), (status = 400, description = "Invalid job data"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<JobUpdate>,
) -> Result<Json<Job>, JsonApiError> {
    patch.validate()?;
    state.store.update_job(id, patch).await?.map(Json).ok_or_else(|| JsonApiError::not_found("Job"))
}
