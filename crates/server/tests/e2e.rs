use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
}

/// Serve the in-memory app on an ephemeral port.
async fn start_server() -> anyhow::Result<TestApp> {
    let mut cfg = configs::AppConfig::default();
    cfg.server.static_dir = None;
    cfg.auth.jwt_secret = Some("test-secret".into());
    let app = server::build_app(&cfg).await?;

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_admin_login_sets_cookie_and_lists_catalog() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(format!("{}/api/auth/login", app.base_url))
        .json(&json!({"email": "admin@guhdeh.com", "password": "admin123"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let cookie = res.headers().get("set-cookie").and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    assert!(cookie.contains("auth_token=") && cookie.contains("HttpOnly"));
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["user"]["fullName"], "Admin User");

    let services = c.get(format!("{}/api/services", app.base_url)).send().await?.json::<serde_json::Value>().await?;
    let names: Vec<&str> = services.as_array().unwrap().iter().filter_map(|s| s["name"].as_str()).collect();
    assert_eq!(names, vec!["Document Delivery", "Food Delivery", "Grocery Shopping", "Pharmacy Pickup"]);
    assert_eq!(services[2]["basePrice"], "15.00");

    let res = c.post(format!("{}/api/auth/logout", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn e2e_openapi_document_is_served() -> anyhow::Result<()> {
    let app = start_server().await?;
    let doc = client()
        .get(format!("{}/api-docs/openapi.json", app.base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert!(doc["paths"].get("/api/jobs/recent").is_some());
    assert!(doc["paths"].get("/api/runners/{id}/verify").is_some());
    Ok(())
}

#[tokio::test]
async fn e2e_malformed_json_is_bad_request() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/api/jobs", app.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Invalid request body");
    Ok(())
}
