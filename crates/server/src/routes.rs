pub mod analytics;
pub mod auth;
pub mod disputes;
pub mod jobs;
pub mod runners;
pub mod services;
pub mod subscriptions;
pub mod users;

use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::metrics;
use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn prometheus_metrics() -> (axum::http::StatusCode, String) {
    metrics::encode_metrics()
}

/// JSON API under `/api`, metered per matched route.
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/:id", get(users::get).put(users::update))
        .route("/api/users/:id/runner", get(users::runner))
        .route("/api/users/:id/subscription", get(users::subscription))
        .route("/api/analytics", get(analytics::latest).post(analytics::create))
        .route("/api/analytics/history", get(analytics::history))
        .route("/api/analytics/snapshot", post(analytics::snapshot))
        .route("/api/analytics/job-status", get(analytics::job_status))
        .route("/api/analytics/revenue", get(analytics::revenue))
        .route("/api/runners", get(runners::list).post(runners::create))
        .route("/api/runners/pending", get(runners::pending))
        .route("/api/runners/:id", get(runners::get).put(runners::update))
        .route("/api/runners/:id/verify", put(runners::verify))
        .route("/api/jobs", get(jobs::list).post(jobs::create))
        .route("/api/jobs/recent", get(jobs::recent))
        .route("/api/jobs/:id", get(jobs::get).put(jobs::update))
        .route("/api/services", get(services::list).post(services::create))
        .route("/api/services/:id", get(services::get).put(services::update).delete(services::delete))
        .route("/api/subscriptions", get(subscriptions::list).post(subscriptions::create))
        .route("/api/subscriptions/:id", get(subscriptions::get).put(subscriptions::update))
        .route("/api/disputes", get(disputes::list).post(disputes::create))
        .route("/api/disputes/open", get(disputes::open))
        .route("/api/disputes/:id", get(disputes::get).put(disputes::update))
        .route_layer(middleware::from_fn(metrics::track))
        .with_state(state)
}

/// Build the full application router: API, docs, health, metrics and the dashboard fallback.
pub fn build_router(state: AppState, server: &configs::ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .merge(api_routes(state))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Dashboard SPA: unknown paths get index.html
    if let Some(dir) = &server.static_dir {
        let index = format!("{}/index.html", dir.trim_end_matches('/'));
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    app.layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(RequestBodyLimitLayer::new(server.body_limit_kb * 1024))
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
