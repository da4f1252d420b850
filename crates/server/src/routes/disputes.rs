use axum::{extract::State, http::StatusCode, Json};
use service::domain::{Dispute, DisputeUpdate, NewDispute};
use tracing::info;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/disputes", tag = "disputes", responses((status = 200, description = "Disputes, newest first")))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Dispute>>, JsonApiError> {
    Ok(Json(state.store.list_disputes().await?))
}

#[utoipa::path(get, path = "/api/disputes/open", tag = "disputes", responses((status = 200, description = "Open disputes")))]
pub async fn open(State(state): State<AppState>) -> Result<Json<Vec<Dispute>>, JsonApiError> {
    Ok(Json(state.store.open_disputes().await?))
}

#[utoipa::path(get, path = "/api/disputes/{id}", tag = "disputes", params(("id" = i32, Path, description = "Dispute id")),
    responses((status = 200, description = "Dispute"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Dispute>, JsonApiError> {
    state.store.get_dispute(id).await?.map(Json).ok_or_else(|| JsonApiError::not_found("Dispute"))
}

#[utoipa::path(post, path = "/api/disputes", tag = "disputes",
    responses((status = 201, description = "Created"), (status = 400, description = "Invalid dispute data")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewDispute>,
) -> Result<(StatusCode, Json<Dispute>), JsonApiError> {
    input.validate()?;
    let dispute = state.store.create_dispute(input).await?;
    info!(dispute_id = dispute.id, job_id = dispute.job_id, "dispute opened");
    Ok((StatusCode::CREATED, Json(dispute)))
}

#[utoipa::path(put, path = "/api/disputes/{id}", tag = "disputes", params(("id" = i32, Path, description = "Dispute id")),
    responses((status = 200, description = "Updated"), (status = 400, description = "Invalid dispute data"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<DisputeUpdate>,
) -> Result<Json<Dispute>, JsonApiError> {
    patch.validate()?;
    state.store.update_dispute(id, patch).await?.map(Json).ok_or_else(|| JsonApiError::not_found("Dispute"))
}
