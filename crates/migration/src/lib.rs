//! Migrator registering the table migrations in foreign-key order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users;
mod m20240601_000002_create_runners;
mod m20240601_000003_create_jobs;
mod m20240601_000004_create_services;
mod m20240601_000005_create_subscriptions;
mod m20240601_000006_create_disputes;
mod m20240601_000007_create_analytics;
mod m20240601_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users::Migration),
            Box::new(m20240601_000002_create_runners::Migration),
            Box::new(m20240601_000003_create_jobs::Migration),
            Box::new(m20240601_000004_create_services::Migration),
            Box::new(m20240601_000005_create_subscriptions::Migration),
            Box::new(m20240601_000006_create_disputes::Migration),
            Box::new(m20240601_000007_create_analytics::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000008_add_indexes::Migration),
        ]
    }
}
