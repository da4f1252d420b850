use axum::{extract::State, http::StatusCode, Json};
use common::types::MessageBody;
use service::domain::{NewService, Service, ServiceUpdate};
use tracing::info;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/services", tag = "services", responses((status = 200, description = "Catalog, by name")))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Service>>, JsonApiError> {
    Ok(Json(state.store.list_services().await?))
}

#[utoipa::path(get, path = "/api/services/{id}", tag = "services", params(("id" = i32, Path, description = "Service id")),
    responses((status = 200, description = "Service"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Service>, JsonApiError> {
    state.store.get_service(id).await?.map(Json).ok_or_else(|| JsonApiError::not_found("Service"))
}

#[utoipa::path(post, path = "/api/services", tag = "services",
    responses((status = 201, description = "Created"), (status = 400, description = "Invalid service data")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewService>,
) -> Result<(StatusCode, Json<Service>), JsonApiError> {
    input.validate()?;
    let svc = state.store.create_service(input).await?;
    Ok((StatusCode::CREATED, Json(svc)))
}

#[utoipa::path(put, path = "/api/services/{id}", tag = "services", params(("id" = i32, Path, description = "Service id")),
    responses((status = 200, description = "Updated"), (status = 400, description = "Invalid service data"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<ServiceUpdate>,
) -> Result<Json<Service>, JsonApiError> {
    patch.validate()?;
    state.store.update_service(id, patch).await?.map(Json).ok_or_else(|| JsonApiError::not_found("Service"))
}

#[utoipa::path(delete, path = "/api/services/{id}", tag = "services", params(("id" = i32, Path, description = "Service id")),
    responses((status = 200, description = "Deleted", body = crate::openapi::MessageDoc), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<MessageBody>, JsonApiError> {
    if state.store.delete_service(id).await? {
        info!(service_id = id, "service deleted");
        Ok(Json(MessageBody::new("Service deleted successfully")))
    } else {
        Err(JsonApiError::not_found("Service"))
    }
}
