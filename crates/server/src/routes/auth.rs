use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use service::auth::domain::{AuthSession, LoginInput};

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

pub const AUTH_COOKIE: &str = "auth_token";

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged in"), (status = 401, description = "Invalid credentials"), (status = 403, description = "Admin access required")))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<(CookieJar, Json<AuthSession>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let jar = match &session.token {
        Some(token) => {
            let mut cookie = Cookie::new(AUTH_COOKIE, token.clone());
            cookie.set_path("/");
            cookie.set_http_only(true);
            cookie.set_secure(false);
            cookie.set_same_site(SameSite::Lax);
            jar.add(cookie)
        }
        None => jar,
    };
    Ok((jar, Json(session)))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "auth", responses((status = 204, description = "Session cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}
