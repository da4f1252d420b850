use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::double_option;
use super::validation::{money, Problems};
use crate::errors::ServiceError;

/// A catalog entry, e.g. "Grocery Shopping".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub base_price: Decimal,
    pub price_per_km: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool { true }

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub base_price: Decimal,
    #[serde(default)]
    pub price_per_km: Option<Decimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl NewService {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Problems::new()
            .required("name", &self.name)
            .required("category", &self.category)
            .amount("basePrice", Some(self.base_price))
            .amount("pricePerKm", self.price_per_km)
            .finish()
    }

    pub fn into_service(self, id: i32, now: DateTime<Utc>) -> Service {
        Service {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            base_price: money(self.base_price),
            price_per_km: self.price_per_km.map(money),
            is_active: self.is_active,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub category: Option<String>,
    pub base_price: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub price_per_km: Option<Option<Decimal>>,
    pub is_active: Option<bool>,
}

impl ServiceUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Problems::new()
            .not_blank("name", self.name.as_deref())
            .not_blank("category", self.category.as_deref())
            .amount("basePrice", self.base_price)
            .amount("pricePerKm", self.price_per_km.flatten())
            .finish()
    }
}

impl Service {
    pub fn apply(&mut self, patch: ServiceUpdate) {
        if let Some(v) = patch.name { self.name = v; }
        if let Some(v) = patch.description { self.description = v; }
        if let Some(v) = patch.category { self.category = v; }
        if let Some(v) = patch.base_price { self.base_price = money(v); }
        if let Some(v) = patch.price_per_km { self.price_per_km = v.map(money); }
        if let Some(v) = patch.is_active { self.is_active = v; }
    }
}
