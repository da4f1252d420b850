//! Startup data: the admin account, the default service catalog and a first
//! analytics snapshot. Every step is skipped when its data already exists.

use rust_decimal::Decimal;
use tracing::info;

use crate::auth::hash_password;
use crate::domain::{NewService, NewUserRecord, Role};
use crate::errors::ServiceError;
use crate::insights;
use crate::storage::Storage;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub services_created: usize,
    pub snapshot_created: bool,
}

/// The four errand types offered out of the box: (name, category, base price, price per km) in cents.
const CATALOG: [(&str, &str, i64, i64); 4] = [
    ("Grocery Shopping", "grocery", 1500, 250),
    ("Food Delivery", "food", 1200, 200),
    ("Pharmacy Pickup", "pharmacy", 1000, 150),
    ("Document Delivery", "documents", 800, 100),
];

pub fn service_catalog() -> Vec<NewService> {
    CATALOG
        .iter()
        .map(|(name, category, base, per_km)| NewService {
            name: name.to_string(),
            description: Some(format!("Professional {} service", name.to_lowercase())),
            category: category.to_string(),
            base_price: Decimal::new(*base, 2),
            price_per_km: Some(Decimal::new(*per_km, 2)),
            is_active: true,
        })
        .collect()
}

pub async fn seed<S: Storage + ?Sized>(store: &S, cfg: &configs::SeedConfig) -> Result<SeedReport, ServiceError> {
    let mut report = SeedReport::default();
    if !cfg.enabled {
        return Ok(report);
    }

    if store.get_user_by_email(&cfg.admin_email).await?.is_none() {
        let admin = store
            .create_user(NewUserRecord {
                email: cfg.admin_email.clone(),
                password_hash: hash_password(&cfg.admin_password)?,
                role: Role::Admin,
                full_name: "Admin User".into(),
                is_verified: true,
            })
            .await?;
        info!(user_id = admin.id, email = %admin.email, "seeded admin user");
        report.admin_created = true;
    }

    if cfg.service_catalog && store.list_services().await?.is_empty() {
        for svc in service_catalog() {
            store.create_service(svc).await?;
            report.services_created += 1;
        }
        info!(count = report.services_created, "seeded service catalog");
    }

    if store.latest_analytics().await?.is_none() {
        insights::capture_snapshot(store).await?;
        report.snapshot_created = true;
    }
    Ok(report)
}
