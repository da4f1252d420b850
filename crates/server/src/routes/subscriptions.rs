use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use service::domain::{NewSubscription, Subscription, SubscriptionUpdate};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/subscriptions", tag = "subscriptions", responses((status = 200, description = "Subscriptions, newest first")))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Subscription>>, JsonApiError> {
    Ok(Json(state.store.list_subscriptions().await?))
}

#[utoipa::path(get, path = "/api/subscriptions/{id}", tag = "subscriptions", params(("id" = i32, Path, description = "Subscription id")),
    responses((status = 200, description = "Subscription"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Subscription>, JsonApiError> {
    state.store.get_subscription(id).await?.map(Json).ok_or_else(|| JsonApiError::not_found("Subscription"))
}

#[utoipa::path(post, path = "/api/subscriptions", tag = "subscriptions",
    responses((status = 201, description = "Created"), (status = 400, description = "Invalid subscription data")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewSubscription>,
) -> Result<(StatusCode, Json<Subscription>), JsonApiError> {
    input.validate(Utc::now())?;
    let sub = state.store.create_subscription(input).await?;
    Ok((StatusCode::CREATED, Json(sub)))
}

#[utoipa::path(put, path = "/api/subscriptions/{id}", tag = "subscriptions", params(("id" = i32, Path, description = "Subscription id")),
    responses((status = 200, description = "Updated"), (status = 400, description = "Invalid subscription data"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<SubscriptionUpdate>,
) -> Result<Json<Subscription>, JsonApiError> {
    patch.validate()?;
    state
        .store
        .update_subscription(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("Subscription"))
}
