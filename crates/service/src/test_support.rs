#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use rust_decimal::Decimal;

use crate::domain::{JobStatus, NewJob, NewUserRecord, Role};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Database tests run only against an explicitly configured Postgres.
pub fn db_tests_disabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

fn db_config() -> configs::DatabaseConfig {
    configs::DatabaseConfig {
        url: models::db::DATABASE_URL.clone(),
        max_connections: 20,
        min_connections: 1,
        acquire_timeout_secs: 10,
        ..configs::DatabaseConfig::default()
    }
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_init(|| async {
            let db = models::db::connect_with_config(&db_config()).await.expect("connect db for migration");
            models::db::migrate(&db).await.expect("migrate up");
            drop(db);
        })
        .await;

    // Return a fresh connection for the current test's runtime
    let db = models::db::connect_with_config(&db_config()).await?;
    Ok(db)
}

/// A user record with a placeholder hash; storage tests do not log in.
pub fn new_user(email: &str, role: Role) -> NewUserRecord {
    NewUserRecord {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".into(),
        role,
        full_name: format!("Test {}", role),
        is_verified: false,
    }
}

pub fn new_job(requester_id: i32, title: &str) -> NewJob {
    NewJob {
        requester_id,
        runner_id: None,
        title: title.to_string(),
        description: None,
        category: "grocery".into(),
        pickup_address: "1 Market Rd".into(),
        dropoff_address: "9 Palm Ave".into(),
        pickup_lat: None,
        pickup_lng: None,
        dropoff_lat: None,
        dropoff_lng: None,
        price: Decimal::new(1500, 2),
        status: JobStatus::Pending,
    }
}

/// Unique email per call so DB tests can share one database.
pub fn unique_email(tag: &str) -> String {
    format!("{tag}_{}@example.com", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}
