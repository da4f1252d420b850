use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::double_option;
use super::enums::VerificationStatus;
use super::validation::Problems;
use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runner {
    pub id: i32,
    pub user_id: i32,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub verification_status: VerificationStatus,
    pub documents_uploaded: bool,
    pub background_check_passed: bool,
    pub vehicle_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRunner {
    pub user_id: i32,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub documents_uploaded: bool,
    #[serde(default)]
    pub background_check_passed: bool,
    #[serde(default)]
    pub vehicle_verified: bool,
}

impl NewRunner {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Problems::new()
            .positive_id("userId", Some(self.user_id))
            .not_blank("phone", self.phone.as_deref())
            .not_blank("nationalId", self.national_id.as_deref())
            .finish()
    }

    pub fn into_runner(self, id: i32, now: DateTime<Utc>) -> Runner {
        Runner {
            id,
            user_id: self.user_id,
            national_id: self.national_id,
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            verification_status: self.verification_status,
            documents_uploaded: self.documents_uploaded,
            background_check_passed: self.background_check_passed,
            vehicle_verified: self.vehicle_verified,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerUpdate {
    #[serde(default, deserialize_with = "double_option")]
    pub national_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_of_birth: Option<Option<String>>,
    pub verification_status: Option<VerificationStatus>,
    pub documents_uploaded: Option<bool>,
    pub background_check_passed: Option<bool>,
    pub vehicle_verified: Option<bool>,
}

impl RunnerUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Problems::new()
            .not_blank("phone", self.phone.as_ref().and_then(|p| p.as_deref()))
            .not_blank("nationalId", self.national_id.as_ref().and_then(|p| p.as_deref()))
            .finish()
    }
}

/// Admin decision on a runner application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerVerification {
    pub status: VerificationStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RunnerVerification {
    /// The background check counts as passed exactly when the runner is approved.
    pub fn to_update(&self) -> RunnerUpdate {
        RunnerUpdate {
            verification_status: Some(self.status),
            background_check_passed: Some(self.status == VerificationStatus::Approved),
            ..RunnerUpdate::default()
        }
    }
}

impl Runner {
    pub fn apply(&mut self, patch: RunnerUpdate) {
        if let Some(v) = patch.national_id { self.national_id = v; }
        if let Some(v) = patch.phone { self.phone = v; }
        if let Some(v) = patch.date_of_birth { self.date_of_birth = v; }
        if let Some(v) = patch.verification_status { self.verification_status = v; }
        if let Some(v) = patch.documents_uploaded { self.documents_uploaded = v; }
        if let Some(v) = patch.background_check_passed { self.background_check_passed = v; }
        if let Some(v) = patch.vehicle_verified { self.vehicle_verified = v; }
    }
}
