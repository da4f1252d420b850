use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Role;
use super::validation::Problems;
use crate::errors::ServiceError;

/// A stored user. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub full_name: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Client input for creating a user; `password` is plain text here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub full_name: String,
    #[serde(default)]
    pub is_verified: bool,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Problems::new()
            .required("email", &self.email)
            .email("email", &self.email)
            .password("password", &self.password)
            .required("fullName", &self.full_name)
            .finish()
    }
}

/// What storage receives once the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub full_name: String,
    pub is_verified: bool,
}

impl NewUserRecord {
    pub fn into_user(self, id: i32, now: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email.trim().to_string(),
            password_hash: self.password_hash,
            role: self.role,
            full_name: self.full_name,
            is_verified: self.is_verified,
            created_at: now,
        }
    }
}

/// Client patch for a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub full_name: Option<String>,
    pub is_verified: Option<bool>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut p = Problems::new();
        if let Some(email) = &self.email {
            p.email("email", email);
        }
        if let Some(password) = &self.password {
            p.password("password", password);
        }
        p.not_blank("fullName", self.full_name.as_deref()).finish()
    }
}

/// Storage-level patch; a new password arrives already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub full_name: Option<String>,
    pub is_verified: Option<bool>,
}

impl User {
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(email) = changes.email { self.email = email.trim().to_string(); }
        if let Some(hash) = changes.password_hash { self.password_hash = hash; }
        if let Some(role) = changes.role { self.role = role; }
        if let Some(name) = changes.full_name { self.full_name = name; }
        if let Some(v) = changes.is_verified { self.is_verified = v; }
    }
}
