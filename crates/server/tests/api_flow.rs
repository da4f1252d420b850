use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::routes;
use server::state::AppState;
use service::auth::AuthConfig;
use service::storage::{MemStorage, Storage};

async fn build_app() -> Router {
    let store: Arc<dyn Storage> = Arc::new(MemStorage::new());
    service::seed::seed(&*store, &configs::SeedConfig::default()).await.unwrap();
    let state = AppState::new(store, AuthConfig { jwt_secret: Some("test-secret".into()), token_ttl_hours: 1 });
    let server = configs::ServerConfig { static_dir: None, ..Default::default() };
    routes::build_router(state, &server)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, json) = send_full(app, method, uri, body).await;
    (status, json)
}

async fn send_full(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, json)
}

async fn create_user(app: &Router, email: &str, role: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        Some(json!({"email": email, "password": "Passw0rd!", "role": role, "fullName": "Ada Obi"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let app = build_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn login_outcomes() {
    let app = build_app().await;

    let (status, body) =
        send(&app, "POST", "/api/auth/login", Some(json!({"email": "admin@guhdeh.com", "password": "wrong"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    create_user(&app, "req@guhdeh.com", "requester").await;
    let (status, body) =
        send(&app, "POST", "/api/auth/login", Some(json!({"email": "req@guhdeh.com", "password": "Passw0rd!"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin access required");

    let (status, headers, body) = send_full(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"email": "admin@guhdeh.com", "password": "admin123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "admin@guhdeh.com");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["token"].is_string());
    let cookie = headers.get("set-cookie").and_then(|v| v.to_str().ok()).unwrap_or_default();
    assert!(cookie.starts_with("auth_token="));

    let (status, _) = send(&app, "POST", "/api/auth/logout", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn pharmacy_run_completes_once() {
    let app = build_app().await;
    let requester = create_user(&app, "pat@guhdeh.com", "requester").await;

    let (status, job) = send(
        &app,
        "POST",
        "/api/jobs",
        Some(json!({
            "requesterId": requester,
            "title": "Pharmacy run",
            "category": "pharmacy",
            "pickupAddress": "12 Allen Ave",
            "dropoffAddress": "4 Bode Thomas St",
            "price": "10.00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{job}");
    assert_eq!(job["id"], 1);
    assert_eq!(job["status"], "pending");
    assert_eq!(job["price"], "10.00");
    assert!(job["completedAt"].is_null());

    let (status, done) = send(&app, "PUT", "/api/jobs/1", Some(json!({"status": "completed"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");
    let completed_at = done["completedAt"].clone();
    assert!(completed_at.is_string());

    let (_, again) = send(&app, "PUT", "/api/jobs/1", Some(json!({"status": "completed"}))).await;
    assert_eq!(again["completedAt"], completed_at);

    let (status, _) = send(&app, "PUT", "/api/jobs/99", Some(json!({"status": "completed"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_input_is_rejected_with_details() {
    let app = build_app().await;
    let requester = create_user(&app, "val@guhdeh.com", "requester").await;

    let (status, body) = send(&app, "POST", "/api/jobs", Some(json!({"title": "no requester"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/jobs",
        Some(json!({
            "requesterId": requester,
            "title": " ",
            "category": "grocery",
            "pickupAddress": "a",
            "dropoffAddress": "b",
            "price": "-1.00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().map(|e| e.len()), Some(2), "{body}");

    let oversized = json!({
        "requesterId": requester,
        "title": "Huge",
        "category": "grocery",
        "pickupAddress": "a",
        "dropoffAddress": "b",
        "price": "70000000000000000000000000000"
    });
    let (status, body) = send(&app, "POST", "/api/jobs", Some(oversized)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0], "price must not exceed 99999999.99", "{body}");

    let (status, job) = send(
        &app,
        "POST",
        "/api/jobs",
        Some(json!({
            "requesterId": requester,
            "title": "Fine",
            "category": "grocery",
            "pickupAddress": "a",
            "dropoffAddress": "b",
            "price": "99999999.99"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{job}");
    let uri = format!("/api/jobs/{}", job["id"]);
    let (status, _) = send(&app, "PUT", &uri, Some(json!({"price": "100000000.00"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", "/api/jobs/999", Some(json!({"runnerId": 4242}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "PUT", &uri, Some(json!({"runnerId": 4242}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/jobs/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/jobs?status=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/users", Some(json!({"email": "val@guhdeh.com", "password": "Passw0rd!", "fullName": "Dup"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn runner_verification_flow() {
    let app = build_app().await;
    let user = create_user(&app, "run@guhdeh.com", "runner").await;

    let (status, runner) = send(&app, "POST", "/api/runners", Some(json!({"userId": user, "phone": "+2348000000000"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(runner["verificationStatus"], "pending");
    let id = runner["id"].as_i64().unwrap();

    let (_, pending) = send(&app, "GET", "/api/runners/pending", None).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(1));

    let (status, verified) = send(
        &app,
        "PUT",
        &format!("/api/runners/{id}/verify"),
        Some(json!({"status": "approved", "notes": "documents checked"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["verificationStatus"], "approved");
    assert_eq!(verified["backgroundCheckPassed"], true);

    let (_, pending) = send(&app, "GET", "/api/runners/pending", None).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(0));

    let (status, profile) = send(&app, "GET", &format!("/api/users/{user}/runner"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["id"], id);

    let (status, _) = send(&app, "PUT", "/api/runners/77/verify", Some(json!({"status": "rejected"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn service_catalog_and_delete() {
    let app = build_app().await;
    let (_, services) = send(&app, "GET", "/api/services", None).await;
    assert_eq!(services.as_array().map(Vec::len), Some(4));

    let (status, body) = send(&app, "DELETE", "/api/services/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Service deleted successfully");

    let (status, _) = send(&app, "DELETE", "/api/services/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/api/services/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn disputes_and_subscriptions() {
    let app = build_app().await;
    let user = create_user(&app, "sub@guhdeh.com", "requester").await;
    let (_, job) = send(
        &app,
        "POST",
        "/api/jobs",
        Some(json!({"requesterId": user, "title": "Groceries", "category": "grocery", "pickupAddress": "a", "dropoffAddress": "b", "price": 12.5})),
    )
    .await;

    let (status, dispute) = send(
        &app,
        "POST",
        "/api/disputes",
        Some(json!({"jobId": job["id"], "reporterId": user, "reason": "Item missing"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dispute["status"], "open");

    let (_, open) = send(&app, "GET", "/api/disputes/open", None).await;
    assert_eq!(open.as_array().map(Vec::len), Some(1));

    let path = format!("/api/disputes/{}", dispute["id"]);
    let (_, resolved) = send(&app, "PUT", &path, Some(json!({"status": "resolved", "resolution": "refunded"}))).await;
    assert!(resolved["resolvedAt"].is_string());
    let (_, open) = send(&app, "GET", "/api/disputes/open", None).await;
    assert_eq!(open.as_array().map(Vec::len), Some(0));

    let (status, body) = send(
        &app,
        "POST",
        "/api/subscriptions",
        Some(json!({"userId": user, "plan": "premium", "monthlyPrice": "29.99", "errandsUsed": 5, "errandsLimit": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, sub) = send(
        &app,
        "POST",
        "/api/subscriptions",
        Some(json!({"userId": user, "plan": "premium", "monthlyPrice": "29.99", "errandsLimit": 20})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sub["status"], "active");

    let (status, active) = send(&app, "GET", &format!("/api/users/{user}/subscription"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["id"], sub["id"]);
}

#[tokio::test]
async fn recent_jobs_and_analytics() {
    let app = build_app().await;
    let user = create_user(&app, "many@guhdeh.com", "requester").await;
    for i in 0..8 {
        send(
            &app,
            "POST",
            "/api/jobs",
            Some(json!({"requesterId": user, "title": format!("errand {i}"), "category": "food", "pickupAddress": "a", "dropoffAddress": "b", "price": "8.00"})),
        )
        .await;
    }
    let (_, recent) = send(&app, "GET", "/api/jobs/recent?limit=5", None).await;
    let ids: Vec<i64> = recent.as_array().unwrap().iter().filter_map(|j| j["id"].as_i64()).collect();
    assert_eq!(ids, vec![8, 7, 6, 5, 4]);

    send(&app, "PUT", "/api/jobs/3", Some(json!({"status": "completed"}))).await;

    let (status, latest) = send(&app, "GET", "/api/analytics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["totalJobs"], 0);

    let (status, snap) = send(&app, "POST", "/api/analytics/snapshot", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(snap["totalJobs"], 8);
    assert_eq!(snap["completedJobs"], 1);
    assert_eq!(snap["revenue"], "8.00");

    let (_, history) = send(&app, "GET", "/api/analytics/history", None).await;
    assert_eq!(history[0]["id"], snap["id"]);

    let (_, breakdown) = send(&app, "GET", "/api/analytics/job-status", None).await;
    assert_eq!(breakdown[0], json!({"status": "Completed", "count": 1}));
    assert_eq!(breakdown[2], json!({"status": "Pending", "count": 7}));

    let (_, revenue) = send(&app, "GET", "/api/analytics/revenue", None).await;
    let months = revenue.as_array().unwrap();
    assert_eq!(months.len(), 6);
    assert_eq!(months[5]["revenue"], json!(8.0));

    let (status, _) = send(&app, "GET", "/api/analytics/revenue?months=25", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn metrics_count_routed_requests() {
    let app = build_app().await;
    send(&app, "GET", "/api/services", None).await;
    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("guhdeh_http_requests_total"));
}
