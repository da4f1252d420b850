use axum::{extract::State, http::StatusCode, Json};
use service::domain::{NewRunner, Runner, RunnerUpdate, RunnerVerification};
use tracing::info;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/runners", tag = "runners", responses((status = 200, description = "All runners, newest first")))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Runner>>, JsonApiError> {
    Ok(Json(state.store.list_runners().await?))
}

#[utoipa::path(get, path = "/api/runners/pending", tag = "runners", responses((status = 200, description = "Runners awaiting verification")))]
pub async fn pending(State(state): State<AppState>) -> Result<Json<Vec<Runner>>, JsonApiError> {
    Ok(Json(state.store.pending_runners().await?))
}

#[utoipa::path(get, path = "/api/runners/{id}", tag = "runners", params(("id" = i32, Path, description = "Runner id")),
    responses((status = 200, description = "Runner"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Runner>, JsonApiError> {
    state.store.get_runner(id).await?.map(Json).ok_or_else(|| JsonApiError::not_found("Runner"))
}

#[utoipa::path(post, path = "/api/runners", tag = "runners",
    responses((status = 201, description = "Created"), (status = 400, description = "Invalid runner data")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewRunner>,
) -> Result<(StatusCode, Json<Runner>), JsonApiError> {
    input.validate()?;
    let runner = state.store.create_runner(input).await?;
    info!(runner_id = runner.id, user_id = runner.user_id, "runner created");
    Ok((StatusCode::CREATED, Json(runner)))
}

#[utoipa::path(put, path = "/api/runners/{id}", tag = "runners", params(("id" = i32, Path, description = "Runner id")),
    responses((status = 200, description = "Updated"), (status = 400, description = "Invalid runner data"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<RunnerUpdate>,
) -> Result<Json<Runner>, JsonApiError> {
    patch.validate()?;
    state.store.update_runner(id, patch).await?.map(Json).ok_or_else(|| JsonApiError::not_found("Runner"))
}

#[utoipa::path(put, path = "/api/runners/{id}/verify", tag = "runners", params(("id" = i32, Path, description = "Runner id")),
    responses((status = 200, description = "Verification recorded"), (status = 400, description = "Unknown status"), (status = 404, description = "Not found")))]
pub async fn verify(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(decision): ApiJson<RunnerVerification>,
) -> Result<Json<Runner>, JsonApiError> {
    let runner = state
        .store
        .update_runner(id, decision.to_update())
        .await?
        .ok_or_else(|| JsonApiError::not_found("Runner"))?;
    info!(runner_id = id, status = %decision.status, notes = ?decision.notes, "runner verification recorded");
    Ok(Json(runner))
}
