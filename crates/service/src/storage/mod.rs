//! Persistence seam for the service layer.
//!
//! `Storage` is implemented by [`memory::MemStorage`] (process-local tables
//! behind one lock) and [`seaorm::SeaOrmStorage`] (Postgres via sea-orm). Both
//! apply the same defaults, side effects and ordering so callers cannot tell
//! them apart. Absence is `Ok(None)` / `Ok(false)`, never an error.

pub mod memory;
pub mod seaorm;

use async_trait::async_trait;

use crate::domain::{
    Analytics, Dispute, DisputeUpdate, Job, JobStatus, JobUpdate, NewAnalytics, NewDispute, NewJob, NewRunner,
    NewService, NewSubscription, NewUserRecord, Runner, RunnerUpdate, Service, ServiceUpdate, Subscription,
    SubscriptionUpdate, User, UserChanges,
};
use crate::errors::ServiceError;

pub use memory::MemStorage;
pub use seaorm::SeaOrmStorage;

pub type StorageResult<T> = Result<T, ServiceError>;

#[async_trait]
pub trait Storage: Send + Sync {
    // users: id ascending
    async fn list_users(&self) -> StorageResult<Vec<User>>;
    async fn get_user(&self, id: i32) -> StorageResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;
    /// Fails with `Conflict` when the email is taken.
    async fn create_user(&self, input: NewUserRecord) -> StorageResult<User>;
    async fn update_user(&self, id: i32, changes: UserChanges) -> StorageResult<Option<User>>;

    // runners: newest first
    async fn list_runners(&self) -> StorageResult<Vec<Runner>>;
    async fn get_runner(&self, id: i32) -> StorageResult<Option<Runner>>;
    async fn get_runner_by_user_id(&self, user_id: i32) -> StorageResult<Option<Runner>>;
    async fn create_runner(&self, input: NewRunner) -> StorageResult<Runner>;
    async fn update_runner(&self, id: i32, patch: RunnerUpdate) -> StorageResult<Option<Runner>>;
    async fn pending_runners(&self) -> StorageResult<Vec<Runner>>;

    // jobs: newest first
    async fn list_jobs(&self) -> StorageResult<Vec<Job>>;
    async fn get_job(&self, id: i32) -> StorageResult<Option<Job>>;
    async fn create_job(&self, input: NewJob) -> StorageResult<Job>;
    async fn update_job(&self, id: i32, patch: JobUpdate) -> StorageResult<Option<Job>>;
    async fn jobs_by_status(&self, status: JobStatus) -> StorageResult<Vec<Job>>;
    async fn recent_jobs(&self, limit: usize) -> StorageResult<Vec<Job>>;

    // services: by name
    async fn list_services(&self) -> StorageResult<Vec<Service>>;
    async fn get_service(&self, id: i32) -> StorageResult<Option<Service>>;
    async fn create_service(&self, input: NewService) -> StorageResult<Service>;
    async fn update_service(&self, id: i32, patch: ServiceUpdate) -> StorageResult<Option<Service>>;
    async fn delete_service(&self, id: i32) -> StorageResult<bool>;

    // subscriptions: newest start date first
    async fn list_subscriptions(&self) -> StorageResult<Vec<Subscription>>;
    async fn get_subscription(&self, id: i32) -> StorageResult<Option<Subscription>>;
    /// The user's `active` subscription, if any.
    async fn get_subscription_by_user_id(&self, user_id: i32) -> StorageResult<Option<Subscription>>;
    async fn create_subscription(&self, input: NewSubscription) -> StorageResult<Subscription>;
    async fn update_subscription(&self, id: i32, patch: SubscriptionUpdate) -> StorageResult<Option<Subscription>>;

    // disputes: newest first
    async fn list_disputes(&self) -> StorageResult<Vec<Dispute>>;
    async fn get_dispute(&self, id: i32) -> StorageResult<Option<Dispute>>;
    async fn create_dispute(&self, input: NewDispute) -> StorageResult<Dispute>;
    async fn update_dispute(&self, id: i32, patch: DisputeUpdate) -> StorageResult<Option<Dispute>>;
    async fn open_disputes(&self) -> StorageResult<Vec<Dispute>>;

    // analytics: newest date first
    async fn list_analytics(&self) -> StorageResult<Vec<Analytics>>;
    async fn create_analytics(&self, input: NewAnalytics) -> StorageResult<Analytics>;
    async fn latest_analytics(&self) -> StorageResult<Option<Analytics>>;
}

pub(crate) fn missing_reference(field: &str, id: i32) -> ServiceError {
    ServiceError::invalid(format!("{field} {id} does not exist"))
}

pub(crate) fn email_taken(email: &str) -> ServiceError {
    ServiceError::Conflict(format!("a user with email {email} already exists"))
}
