use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::double_option;
use super::enums::DisputeStatus;
use super::validation::Problems;
use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    pub id: i32,
    pub job_id: i32,
    pub reporter_id: i32,
    pub reason: String,
    pub description: Option<String>,
    pub status: DisputeStatus,
    pub resolution: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDispute {
    pub job_id: i32,
    pub reporter_id: i32,
    pub reason: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: DisputeStatus,
    #[serde(default)]
    pub resolution: Option<String>,
}

impl NewDispute {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Problems::new()
            .positive_id("jobId", Some(self.job_id))
            .positive_id("reporterId", Some(self.reporter_id))
            .required("reason", &self.reason)
            .finish()
    }

    pub fn into_dispute(self, id: i32, now: DateTime<Utc>) -> Dispute {
        Dispute {
            id,
            job_id: self.job_id,
            reporter_id: self.reporter_id,
            reason: self.reason,
            description: self.description,
            status: self.status,
            resolution: self.resolution,
            created_at: now,
            resolved_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeUpdate {
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<DisputeStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub resolution: Option<Option<String>>,
}

impl DisputeUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Problems::new().not_blank("reason", self.reason.as_deref()).finish()
    }
}

impl Dispute {
    /// `resolvedAt` is stamped the first time the status becomes `resolved`.
    pub fn apply(&mut self, patch: DisputeUpdate, now: DateTime<Utc>) {
        if let Some(v) = patch.reason { self.reason = v; }
        if let Some(v) = patch.description { self.description = v; }
        if let Some(v) = patch.resolution { self.resolution = v; }
        if let Some(status) = patch.status {
            self.status = status;
            if status == DisputeStatus::Resolved && self.resolved_at.is_none() {
                self.resolved_at = Some(now);
            }
        }
    }
}
