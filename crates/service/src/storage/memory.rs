use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{email_taken, missing_reference, Storage, StorageResult};
use crate::domain::{
    Analytics, Dispute, DisputeStatus, DisputeUpdate, Job, JobStatus, JobUpdate, NewAnalytics, NewDispute, NewJob,
    NewRunner, NewService, NewSubscription, NewUserRecord, Runner, RunnerUpdate, Service, ServiceUpdate,
    Subscription, SubscriptionStatus, SubscriptionUpdate, User, UserChanges, VerificationStatus,
};

/// Rows of one entity plus its id counter. Ids start at 1 and are never reused.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self { Self { rows: BTreeMap::new(), last_id: 0 } }
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn get(&self, id: i32) -> Option<T> { self.rows.get(&id).cloned() }

    fn contains(&self, id: i32) -> bool { self.rows.contains_key(&id) }

    fn all(&self) -> Vec<T> { self.rows.values().cloned().collect() }

    fn filtered(&self, pred: impl Fn(&T) -> bool) -> Vec<T> { self.rows.values().filter(|r| pred(r)).cloned().collect() }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    runners: Table<Runner>,
    jobs: Table<Job>,
    services: Table<Service>,
    subscriptions: Table<Subscription>,
    disputes: Table<Dispute>,
    analytics: Table<Analytics>,
}

/// In-process storage. A single lock covers every table and counter, so id
/// assignment and read-modify-write updates are atomic per call.
#[derive(Debug, Default)]
pub struct MemStorage {
    inner: RwLock<Tables>,
}

impl MemStorage {
    pub fn new() -> Self { Self::default() }
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, i32)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl Storage for MemStorage {
    async fn list_users(&self) -> StorageResult<Vec<User>> { Ok(self.inner.read().await.users.all()) }

    async fn get_user(&self, id: i32) -> StorageResult<Option<User>> { Ok(self.inner.read().await.users.get(id)) }

    async fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let t = self.inner.read().await;
        let email = email.trim();
        Ok(t.users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, input: NewUserRecord) -> StorageResult<User> {
        let mut t = self.inner.write().await;
        if t.users.rows.values().any(|u| u.email == input.email.trim()) {
            return Err(email_taken(&input.email));
        }
        let id = t.users.next_id();
        let user = input.into_user(id, Utc::now());
        t.users.rows.insert(id, user.clone());
        debug!(user_id = id, "user stored");
        Ok(user)
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> StorageResult<Option<User>> {
        let mut t = self.inner.write().await;
        if let Some(email) = changes.email.as_deref().map(str::trim) {
            if t.users.rows.values().any(|u| u.id != id && u.email == email) {
                return Err(email_taken(email));
            }
        }
        Ok(t.users.rows.get_mut(&id).map(|u| {
            u.apply(changes);
            u.clone()
        }))
    }

    async fn list_runners(&self) -> StorageResult<Vec<Runner>> {
        let mut rows = self.inner.read().await.runners.all();
        newest_first(&mut rows, |r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn get_runner(&self, id: i32) -> StorageResult<Option<Runner>> { Ok(self.inner.read().await.runners.get(id)) }

    async fn get_runner_by_user_id(&self, user_id: i32) -> StorageResult<Option<Runner>> {
        let t = self.inner.read().await;
        Ok(t.runners.rows.values().find(|r| r.user_id == user_id).cloned())
    }

    async fn create_runner(&self, input: NewRunner) -> StorageResult<Runner> {
        let mut t = self.inner.write().await;
        if !t.users.contains(input.user_id) {
            return Err(missing_reference("userId", input.user_id));
        }
        let id = t.runners.next_id();
        let runner = input.into_runner(id, Utc::now());
        t.runners.rows.insert(id, runner.clone());
        Ok(runner)
    }

    async fn update_runner(&self, id: i32, patch: RunnerUpdate) -> StorageResult<Option<Runner>> {
        let mut t = self.inner.write().await;
        Ok(t.runners.rows.get_mut(&id).map(|r| {
            r.apply(patch);
            r.clone()
        }))
    }

    async fn pending_runners(&self) -> StorageResult<Vec<Runner>> {
        let mut rows = self.inner.read().await.runners.filtered(|r| r.verification_status == VerificationStatus::Pending);
        newest_first(&mut rows, |r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn list_jobs(&self) -> StorageResult<Vec<Job>> {
        let mut rows = self.inner.read().await.jobs.all();
        newest_first(&mut rows, |j| (j.created_at, j.id));
        Ok(rows)
    }

    async fn get_job(&self, id: i32) -> StorageResult<Option<Job>> { Ok(self.inner.read().await.jobs.get(id)) }

    async fn create_job(&self, input: NewJob) -> StorageResult<Job> {
        let mut t = self.inner.write().await;
        if !t.users.contains(input.requester_id) {
            return Err(missing_reference("requesterId", input.requester_id));
        }
        if let Some(runner_id) = input.runner_id.filter(|r| !t.users.contains(*r)) {
            return Err(missing_reference("runnerId", runner_id));
        }
        let id = t.jobs.next_id();
        let job = input.into_job(id, Utc::now());
        t.jobs.rows.insert(id, job.clone());
        debug!(job_id = id, status = %job.status, "job stored");
        Ok(job)
    }

    async fn update_job(&self, id: i32, patch: JobUpdate) -> StorageResult<Option<Job>> {
        let mut t = self.inner.write().await;
        if !t.jobs.contains(id) {
            return Ok(None);
        }
        if let Some(requester_id) = patch.requester_id.filter(|r| !t.users.contains(*r)) {
            return Err(missing_reference("requesterId", requester_id));
        }
        if let Some(runner_id) = patch.runner_id.flatten().filter(|r| !t.users.contains(*r)) {
            return Err(missing_reference("runnerId", runner_id));
        }
        let now = Utc::now();
        Ok(t.jobs.rows.get_mut(&id).map(|j| {
            j.apply(patch, now);
            j.clone()
        }))
    }

    async fn jobs_by_status(&self, status: JobStatus) -> StorageResult<Vec<Job>> {
        let mut rows = self.inner.read().await.jobs.filtered(|j| j.status == status);
        newest_first(&mut rows, |j| (j.created_at, j.id));
        Ok(rows)
    }

    async fn recent_jobs(&self, limit: usize) -> StorageResult<Vec<Job>> {
        let mut rows = self.list_jobs().await?;
        rows.truncate(limit);
        Ok(rows)
    }

    async fn list_services(&self) -> StorageResult<Vec<Service>> {
        let mut rows = self.inner.read().await.services.all();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn get_service(&self, id: i32) -> StorageResult<Option<Service>> { Ok(self.inner.read().await.services.get(id)) }

    async fn create_service(&self, input: NewService) -> StorageResult<Service> {
        let mut t = self.inner.write().await;
        let id = t.services.next_id();
        let service = input.into_service(id, Utc::now());
        t.services.rows.insert(id, service.clone());
        Ok(service)
    }

    async fn update_service(&self, id: i32, patch: ServiceUpdate) -> StorageResult<Option<Service>> {
        let mut t = self.inner.write().await;
        Ok(t.services.rows.get_mut(&id).map(|s| {
            s.apply(patch);
            s.clone()
        }))
    }

    async fn delete_service(&self, id: i32) -> StorageResult<bool> {
        Ok(self.inner.write().await.services.rows.remove(&id).is_some())
    }

    async fn list_subscriptions(&self) -> StorageResult<Vec<Subscription>> {
        let mut rows = self.inner.read().await.subscriptions.all();
        newest_first(&mut rows, |s| (s.start_date, s.id));
        Ok(rows)
    }

    async fn get_subscription(&self, id: i32) -> StorageResult<Option<Subscription>> {
        Ok(self.inner.read().await.subscriptions.get(id))
    }

    async fn get_subscription_by_user_id(&self, user_id: i32) -> StorageResult<Option<Subscription>> {
        let mut rows = self
            .inner
            .read()
            .await
            .subscriptions
            .filtered(|s| s.user_id == user_id && s.status == SubscriptionStatus::Active);
        newest_first(&mut rows, |s| (s.start_date, s.id));
        Ok(rows.into_iter().next())
    }

    async fn create_subscription(&self, input: NewSubscription) -> StorageResult<Subscription> {
        let mut t = self.inner.write().await;
        if !t.users.contains(input.user_id) {
            return Err(missing_reference("userId", input.user_id));
        }
        let id = t.subscriptions.next_id();
        let sub = input.into_subscription(id, Utc::now());
        t.subscriptions.rows.insert(id, sub.clone());
        Ok(sub)
    }

    async fn update_subscription(&self, id: i32, patch: SubscriptionUpdate) -> StorageResult<Option<Subscription>> {
        let mut t = self.inner.write().await;
        match t.subscriptions.rows.get_mut(&id) {
            Some(s) => {
                s.apply(patch)?;
                Ok(Some(s.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list_disputes(&self) -> StorageResult<Vec<Dispute>> {
        let mut rows = self.inner.read().await.disputes.all();
        newest_first(&mut rows, |d| (d.created_at, d.id));
        Ok(rows)
    }

    async fn get_dispute(&self, id: i32) -> StorageResult<Option<Dispute>> { Ok(self.inner.read().await.disputes.get(id)) }

    async fn create_dispute(&self, input: NewDispute) -> StorageResult<Dispute> {
        let mut t = self.inner.write().await;
        if !t.jobs.contains(input.job_id) {
            return Err(missing_reference("jobId", input.job_id));
        }
        if !t.users.contains(input.reporter_id) {
            return Err(missing_reference("reporterId", input.reporter_id));
        }
        let id = t.disputes.next_id();
        let dispute = input.into_dispute(id, Utc::now());
        t.disputes.rows.insert(id, dispute.clone());
        Ok(dispute)
    }

    async fn update_dispute(&self, id: i32, patch: DisputeUpdate) -> StorageResult<Option<Dispute>> {
        let mut t = self.inner.write().await;
        let now = Utc::now();
        Ok(t.disputes.rows.get_mut(&id).map(|d| {
            d.apply(patch, now);
            d.clone()
        }))
    }

    async fn open_disputes(&self) -> StorageResult<Vec<Dispute>> {
        let mut rows = self.inner.read().await.disputes.filtered(|d| d.status == DisputeStatus::Open);
        newest_first(&mut rows, |d| (d.created_at, d.id));
        Ok(rows)
    }

    async fn list_analytics(&self) -> StorageResult<Vec<Analytics>> {
        let mut rows = self.inner.read().await.analytics.all();
        newest_first(&mut rows, |a| (a.date, a.id));
        Ok(rows)
    }

    async fn create_analytics(&self, input: NewAnalytics) -> StorageResult<Analytics> {
        let mut t = self.inner.write().await;
        let id = t.analytics.next_id();
        let snapshot = input.into_analytics(id, Utc::now());
        t.analytics.rows.insert(id, snapshot.clone());
        Ok(snapshot)
    }

    async fn latest_analytics(&self) -> StorageResult<Option<Analytics>> {
        let t = self.inner.read().await;
        Ok(t.analytics.rows.values().max_by_key(|a| (a.date, a.id)).cloned())
    }
}
