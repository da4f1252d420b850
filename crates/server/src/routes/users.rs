use axum::{extract::State, http::StatusCode, Json};
use service::domain::{NewUser, Runner, Subscription, User, UserUpdate};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/users", tag = "users", responses((status = 200, description = "All users, oldest first")))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, JsonApiError> {
    Ok(Json(state.store.list_users().await?))
}

#[utoipa::path(get, path = "/api/users/{id}", tag = "users", params(("id" = i32, Path, description = "User id")),
    responses((status = 200, description = "User"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<User>, JsonApiError> {
    state.store.get_user(id).await?.map(Json).ok_or_else(|| JsonApiError::not_found("User"))
}

#[utoipa::path(post, path = "/api/users", tag = "users",
    responses((status = 201, description = "Created"), (status = 400, description = "Invalid user data"), (status = 409, description = "Email taken")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<User>), JsonApiError> {
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(put, path = "/api/users/{id}", tag = "users", params(("id" = i32, Path, description = "User id")),
    responses((status = 200, description = "Updated"), (status = 400, description = "Invalid user data"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<UserUpdate>,
) -> Result<Json<User>, JsonApiError> {
    state.auth.update_user(id, patch).await?.map(Json).ok_or_else(|| JsonApiError::not_found("User"))
}

#[utoipa::path(get, path = "/api/users/{id}/runner", tag = "users", params(("id" = i32, Path, description = "User id")),
    responses((status = 200, description = "Runner profile"), (status = 404, description = "Not found")))]
pub async fn runner(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Runner>, JsonApiError> {
    state.store.get_runner_by_user_id(id).await?.map(Json).ok_or_else(|| JsonApiError::not_found("Runner"))
}

#[utoipa::path(get, path = "/api/users/{id}/subscription", tag = "users", params(("id" = i32, Path, description = "User id")),
    responses((status = 200, description = "Active subscription"), (status = 404, description = "Not found")))]
pub async fn subscription(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Subscription>, JsonApiError> {
    state
        .store
        .get_subscription_by_user_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("Subscription"))
}
