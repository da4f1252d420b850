use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, StorageBackend};
use dotenvy::dotenv;
use service::storage::{MemStorage, SeaOrmStorage, Storage};
use tracing::{info, warn};

use crate::routes;
use crate::state::AppState;

/// Build the configured storage backend, migrating Postgres when asked to.
pub async fn build_storage(cfg: &AppConfig) -> anyhow::Result<Arc<dyn Storage>> {
    match cfg.storage.backend {
        StorageBackend::Memory => {
            info!(backend = "memory", "storage ready; data is lost on restart");
            Ok(Arc::new(MemStorage::new()))
        }
        StorageBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            if cfg.storage.run_migrations {
                models::db::migrate(&db).await?;
            }
            info!(backend = "postgres", "storage ready");
            Ok(Arc::new(SeaOrmStorage::new(db)))
        }
    }
}

/// Storage, seed data and router for a loaded config.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let store = build_storage(cfg).await?;
    let report = service::seed::seed(&*store, &cfg.seed).await?;
    info!(?report, "seeding finished");

    if let Some(dir) = &cfg.server.static_dir {
        common::env::ensure_static_dir(dir).await;
    }
    if cfg.auth.jwt_secret.is_none() {
        warn!("JWT_SECRET not set; login will not issue tokens");
    }

    let state = AppState::new(store, service::auth::AuthConfig::from(&cfg.auth));
    Ok(routes::build_router(state, &cfg.server))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: load config, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_default()?;
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, backend = ?cfg.storage.backend, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
