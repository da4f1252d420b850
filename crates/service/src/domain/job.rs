use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::double_option;
use super::enums::JobStatus;
use super::validation::{coordinate, money, Problems};
use crate::errors::ServiceError;

/// An errand posted by a requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub requester_id: i32,
    pub runner_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub pickup_lat: Option<Decimal>,
    pub pickup_lng: Option<Decimal>,
    pub dropoff_lat: Option<Decimal>,
    pub dropoff_lng: Option<Decimal>,
    pub price: Decimal,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub requester_id: i32,
    #[serde(default)]
    pub runner_id: Option<i32>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    #[serde(default)]
    pub pickup_lat: Option<Decimal>,
    #[serde(default)]
    pub pickup_lng: Option<Decimal>,
    #[serde(default)]
    pub dropoff_lat: Option<Decimal>,
    #[serde(default)]
    pub dropoff_lng: Option<Decimal>,
    pub price: Decimal,
    #[serde(default)]
    pub status: JobStatus,
}

impl NewJob {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Problems::new()
            .positive_id("requesterId", Some(self.requester_id))
            .positive_id("runnerId", self.runner_id)
            .required("title", &self.title)
            .required("category", &self.category)
            .required("pickupAddress", &self.pickup_address)
            .required("dropoffAddress", &self.dropoff_address)
            .latitude("pickupLat", self.pickup_lat)
            .longitude("pickupLng", self.pickup_lng)
            .latitude("dropoffLat", self.dropoff_lat)
            .longitude("dropoffLng", self.dropoff_lng)
            .amount("price", Some(self.price))
            .finish()
    }

    /// `completedAt` starts empty whatever the initial status.
    pub fn into_job(self, id: i32, now: DateTime<Utc>) -> Job {
        Job {
            id,
            requester_id: self.requester_id,
            runner_id: self.runner_id,
            title: self.title,
            description: self.description,
            category: self.category,
            pickup_address: self.pickup_address,
            dropoff_address: self.dropoff_address,
            pickup_lat: self.pickup_lat.map(coordinate),
            pickup_lng: self.pickup_lng.map(coordinate),
            dropoff_lat: self.dropoff_lat.map(coordinate),
            dropoff_lng: self.dropoff_lng.map(coordinate),
            price: money(self.price),
            status: self.status,
            created_at: now,
            completed_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub requester_id: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub runner_id: Option<Option<i32>>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub category: Option<String>,
    pub pickup_address: Option<String>,
    pub dropoff_address: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub pickup_lat: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub pickup_lng: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub dropoff_lat: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub dropoff_lng: Option<Option<Decimal>>,
    pub price: Option<Decimal>,
    pub status: Option<JobStatus>,
}

impl JobUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Problems::new()
            .positive_id("requesterId", self.requester_id)
            .positive_id("runnerId", self.runner_id.flatten())
            .not_blank("title", self.title.as_deref())
            .not_blank("category", self.category.as_deref())
            .not_blank("pickupAddress", self.pickup_address.as_deref())
            .not_blank("dropoffAddress", self.dropoff_address.as_deref())
            .latitude("pickupLat", self.pickup_lat.flatten())
            .longitude("pickupLng", self.pickup_lng.flatten())
            .latitude("dropoffLat", self.dropoff_lat.flatten())
            .longitude("dropoffLng", self.dropoff_lng.flatten())
            .amount("price", self.price)
            .finish()
    }
}

impl Job {
    /// Merge a patch. `completedAt` is stamped with `now` the first time the
    /// status becomes `completed` and never changes afterwards.
    pub fn apply(&mut self, patch: JobUpdate, now: DateTime<Utc>) {
        if let Some(v) = patch.requester_id { self.requester_id = v; }
        if let Some(v) = patch.runner_id { self.runner_id = v; }
        if let Some(v) = patch.title { self.title = v; }
        if let Some(v) = patch.description { self.description = v; }
        if let Some(v) = patch.category { self.category = v; }
        if let Some(v) = patch.pickup_address { self.pickup_address = v; }
        if let Some(v) = patch.dropoff_address { self.dropoff_address = v; }
        if let Some(v) = patch.pickup_lat { self.pickup_lat = v.map(coordinate); }
        if let Some(v) = patch.pickup_lng { self.pickup_lng = v.map(coordinate); }
        if let Some(v) = patch.dropoff_lat { self.dropoff_lat = v.map(coordinate); }
        if let Some(v) = patch.dropoff_lng { self.dropoff_lng = v.map(coordinate); }
        if let Some(v) = patch.price { self.price = money(v); }
        if let Some(status) = patch.status {
            self.status = status;
            if status == JobStatus::Completed && self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
        }
    }
}
