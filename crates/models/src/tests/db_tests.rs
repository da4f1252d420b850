use crate::db::{connect, connect_with_config, migrate, DATABASE_URL};
use configs::DatabaseConfig;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use std::time::{Duration, Instant};
use anyhow::Result;

use super::db_tests_disabled;

#[tokio::test]
async fn test_basic_connection() -> Result<()> {
    if db_tests_disabled() {
        println!("Skipping database tests (no DATABASE_URL or SKIP_DB_TESTS is set)");
        return Ok(());
    }

    let start = Instant::now();
    let db = connect().await?;
    let connection_time = start.elapsed();

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1 as test".to_string());
    let row = db.query_one(stmt).await?.expect("one row");
    let test_value: i32 = row.try_get("", "test")?;
    assert_eq!(test_value, 1);
    assert!(connection_time < Duration::from_secs(5), "Connection took too long: {:?}", connection_time);
    Ok(())
}

#[tokio::test]
async fn test_config_connection_and_migrations() -> Result<()> {
    if db_tests_disabled() {
        return Ok(());
    }

    let config = DatabaseConfig {
        url: DATABASE_URL.clone(),
        max_connections: 3,
        min_connections: 1,
        connect_timeout_secs: 10,
        idle_timeout_secs: 60,
        max_lifetime_secs: 300,
        acquire_timeout_secs: 10,
        sqlx_logging: false,
    };
    let db = connect_with_config(&config).await?;
    migrate(&db).await?;

    let stmt = Statement::from_string(
        DatabaseBackend::Postgres,
        "SELECT count(*)::int AS n FROM information_schema.tables WHERE table_name IN \
         ('users','runners','jobs','services','subscriptions','disputes','analytics')"
            .to_string(),
    );
    let row = db.query_one(stmt).await?.expect("one row");
    let n: i32 = row.try_get("", "n")?;
    assert_eq!(n, 7);
    Ok(())
}
