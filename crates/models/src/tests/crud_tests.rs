use crate::db::{connect, migrate};
use crate::{dispute, job, service, user};
use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};
use std::str::FromStr;

use super::db_tests_disabled;

async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migrate(&db).await?;
    Ok(db)
}

async fn insert_user(db: &DatabaseConnection, tag: &str) -> Result<user::Model> {
    let email = format!("{tag}_{}@example.com", Utc::now().timestamp_nanos_opt().unwrap_or_default());
    let am = user::ActiveModel {
        email: Set(email),
        password: Set("not-a-real-hash".into()),
        role: Set("requester".into()),
        full_name: Set(format!("User {tag}")),
        is_verified: Set(false),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

#[tokio::test]
async fn test_user_crud_and_lookup_by_email() -> Result<()> {
    if db_tests_disabled() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let created = insert_user(&db, "crud").await?;
    assert!(created.id > 0);

    let found = user::find_by_email(&db, &created.email).await?;
    assert_eq!(found.map(|u| u.id), Some(created.id));

    let mut am: user::ActiveModel = created.clone().into();
    am.is_verified = Set(true);
    let updated = am.update(&db).await?;
    assert!(updated.is_verified);

    updated.delete(&db).await?;
    assert!(user::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_job_keeps_decimal_scale() -> Result<()> {
    if db_tests_disabled() {
        return Ok(());
    }
    let db = setup_test_db().await?;
    let requester = insert_user(&db, "job").await?;

    let am = job::ActiveModel {
        requester_id: Set(requester.id),
        runner_id: Set(None),
        title: Set("Pharmacy run".into()),
        description: Set(None),
        category: Set("pharmacy".into()),
        pickup_address: Set("1 Main St".into()),
        dropoff_address: Set("2 High St".into()),
        pickup_lat: Set(Some(Decimal::from_str("6.52437900")?)),
        pickup_lng: Set(Some(Decimal::from_str("3.37920600")?)),
        dropoff_lat: Set(None),
        dropoff_lng: Set(None),
        price: Set(Decimal::from_str("10.00")?),
        status: Set("pending".into()),
        created_at: Set(Utc::now().into()),
        completed_at: Set(None),
        ..Default::default()
    };
    let created = am.insert(&db).await?;
    assert_eq!(created.price.to_string(), "10.00");

    // Disputes reference jobs; deleting the job cascades.
    let d = dispute::ActiveModel {
        job_id: Set(created.id),
        reporter_id: Set(requester.id),
        reason: Set("Late delivery".into()),
        description: Set(None),
        status: Set("open".into()),
        resolution: Set(None),
        created_at: Set(Utc::now().into()),
        resolved_at: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    requester.delete(&db).await?;
    assert!(job::Entity::find_by_id(created.id).one(&db).await?.is_none());
    assert!(dispute::Entity::find_by_id(d.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_service_hard_delete() -> Result<()> {
    if db_tests_disabled() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let created = service::ActiveModel {
        name: Set("Laundry Pickup".into()),
        description: Set(Some("Professional laundry pickup service".into())),
        category: Set("laundry".into()),
        base_price: Set(Decimal::from_str("9.50")?),
        price_per_km: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let res = service::Entity::delete_by_id(created.id).exec(&db).await?;
    assert_eq!(res.rows_affected, 1);
    let res = service::Entity::delete_by_id(created.id).exec(&db).await?;
    assert_eq!(res.rows_affected, 0);
    Ok(())
}
