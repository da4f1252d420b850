use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{analytics, dispute, job, runner, service as catalog, subscription, user};
use sea_orm::{
    prelude::DateTimeWithTimeZone, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::debug;

use super::{email_taken, missing_reference, Storage, StorageResult};
use crate::domain::{
    Analytics, Dispute, DisputeStatus, DisputeUpdate, Job, JobStatus, JobUpdate, NewAnalytics, NewDispute, NewJob,
    NewRunner, NewService, NewSubscription, NewUserRecord, Runner, RunnerUpdate, Service, ServiceUpdate,
    Subscription, SubscriptionStatus, SubscriptionUpdate, User, UserChanges, VerificationStatus,
};
use crate::errors::ServiceError;

/// Postgres-backed storage. Updates run read-modify-write inside a
/// transaction and reuse the domain `apply` rules.
pub struct SeaOrmStorage {
    pub db: DatabaseConnection,
}

impl SeaOrmStorage {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn utc(t: DateTimeWithTimeZone) -> DateTime<Utc> { t.with_timezone(&Utc) }

fn tz(t: DateTime<Utc>) -> DateTimeWithTimeZone { t.into() }

fn parse<E: FromStr>(column: &str, raw: &str) -> StorageResult<E> {
    raw.parse().map_err(|_| ServiceError::Db(format!("unexpected {column} value `{raw}`")))
}

fn unique_email_violation(e: DbErr, email: &str) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => email_taken(email),
        _ => e.into(),
    }
}

async fn user_exists<C: ConnectionTrait>(conn: &C, id: i32) -> StorageResult<bool> {
    Ok(user::Entity::find_by_id(id).one(conn).await?.is_some())
}

fn user_from(m: user::Model) -> StorageResult<User> {
    Ok(User {
        id: m.id,
        email: m.email,
        password_hash: m.password,
        role: parse("role", &m.role)?,
        full_name: m.full_name,
        is_verified: m.is_verified,
        created_at: utc(m.created_at),
    })
}

fn user_row(u: &User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id),
        email: Set(u.email.clone()),
        password: Set(u.password_hash.clone()),
        role: Set(u.role.as_str().to_string()),
        full_name: Set(u.full_name.clone()),
        is_verified: Set(u.is_verified),
        created_at: Set(tz(u.created_at)),
    }
}

fn runner_from(m: runner::Model) -> StorageResult<Runner> {
    Ok(Runner {
        id: m.id,
        user_id: m.user_id,
        national_id: m.national_id,
        phone: m.phone,
        date_of_birth: m.date_of_birth,
        verification_status: parse("verification_status", &m.verification_status)?,
        documents_uploaded: m.documents_uploaded,
        background_check_passed: m.background_check_passed,
        vehicle_verified: m.vehicle_verified,
        created_at: utc(m.created_at),
    })
}

fn runner_row(r: &Runner) -> runner::ActiveModel {
    runner::ActiveModel {
        id: Set(r.id),
        user_id: Set(r.user_id),
        national_id: Set(r.national_id.clone()),
        phone: Set(r.phone.clone()),
        date_of_birth: Set(r.date_of_birth.clone()),
        verification_status: Set(r.verification_status.as_str().to_string()),
        documents_uploaded: Set(r.documents_uploaded),
        background_check_passed: Set(r.background_check_passed),
        vehicle_verified: Set(r.vehicle_verified),
        created_at: Set(tz(r.created_at)),
    }
}

fn job_from(m: job::Model) -> StorageResult<Job> {
    Ok(Job {
        id: m.id,
        requester_id: m.requester_id,
        runner_id: m.runner_id,
        title: m.title,
        description: m.description,
        category: m.category,
        pickup_address: m.pickup_address,
        dropoff_address: m.dropoff_address,
        pickup_lat: m.pickup_lat,
        pickup_lng: m.pickup_lng,
        dropoff_lat: m.dropoff_lat,
        dropoff_lng: m.dropoff_lng,
        price: m.price,
        status: parse("status", &m.status)?,
        created_at: utc(m.created_at),
        completed_at: m.completed_at.map(utc),
    })
}

fn job_row(j: &Job) -> job::ActiveModel {
    job::ActiveModel {
        id: Set(j.id),
        requester_id: Set(j.requester_id),
        runner_id: Set(j.runner_id),
        title: Set(j.title.clone()),
        description: Set(j.description.clone()),
        category: Set(j.category.clone()),
        pickup_address: Set(j.pickup_address.clone()),
        dropoff_address: Set(j.dropoff_address.clone()),
        pickup_lat: Set(j.pickup_lat),
        pickup_lng: Set(j.pickup_lng),
        dropoff_lat: Set(j.dropoff_lat),
        dropoff_lng: Set(j.dropoff_lng),
        price: Set(j.price),
        status: Set(j.status.as_str().to_string()),
        created_at: Set(tz(j.created_at)),
        completed_at: Set(j.completed_at.map(tz)),
    }
}

fn service_from(m: catalog::Model) -> Service {
    Service {
        id: m.id,
        name: m.name,
        description: m.description,
        category: m.category,
        base_price: m.base_price,
        price_per_km: m.price_per_km,
        is_active: m.is_active,
        created_at: utc(m.created_at),
    }
}

fn service_row(s: &Service) -> catalog::ActiveModel {
    catalog::ActiveModel {
        id: Set(s.id),
        name: Set(s.name.clone()),
        description: Set(s.description.clone()),
        category: Set(s.category.clone()),
        base_price: Set(s.base_price),
        price_per_km: Set(s.price_per_km),
        is_active: Set(s.is_active),
        created_at: Set(tz(s.created_at)),
    }
}

fn subscription_from(m: subscription::Model) -> StorageResult<Subscription> {
    Ok(Subscription {
        id: m.id,
        user_id: m.user_id,
        plan: parse("plan", &m.plan)?,
        status: parse("status", &m.status)?,
        start_date: utc(m.start_date),
        end_date: m.end_date.map(utc),
        monthly_price: m.monthly_price,
        errands_used: m.errands_used,
        errands_limit: m.errands_limit,
    })
}

fn subscription_row(s: &Subscription) -> subscription::ActiveModel {
    subscription::ActiveModel {
        id: Set(s.id),
        user_id: Set(s.user_id),
        plan: Set(s.plan.as_str().to_string()),
        status: Set(s.status.as_str().to_string()),
        start_date: Set(tz(s.start_date)),
        end_date: Set(s.end_date.map(tz)),
        monthly_price: Set(s.monthly_price),
        errands_used: Set(s.errands_used),
        errands_limit: Set(s.errands_limit),
    }
}

fn dispute_from(m: dispute::Model) -> StorageResult<Dispute> {
    Ok(Dispute {
        id: m.id,
        job_id: m.job_id,
        reporter_id: m.reporter_id,
        reason: m.reason,
        description: m.description,
        status: parse("status", &m.status)?,
        resolution: m.resolution,
        created_at: utc(m.created_at),
        resolved_at: m.resolved_at.map(utc),
    })
}

fn dispute_row(d: &Dispute) -> dispute::ActiveModel {
    dispute::ActiveModel {
        id: Set(d.id),
        job_id: Set(d.job_id),
        reporter_id: Set(d.reporter_id),
        reason: Set(d.reason.clone()),
        description: Set(d.description.clone()),
        status: Set(d.status.as_str().to_string()),
        resolution: Set(d.resolution.clone()),
        created_at: Set(tz(d.created_at)),
        resolved_at: Set(d.resolved_at.map(tz)),
    }
}

fn analytics_from(m: analytics::Model) -> Analytics {
    Analytics {
        id: m.id,
        date: utc(m.date),
        total_jobs: m.total_jobs,
        completed_jobs: m.completed_jobs,
        active_runners: m.active_runners,
        revenue: m.revenue,
        disputes: m.disputes,
    }
}

fn analytics_row(a: &Analytics) -> analytics::ActiveModel {
    analytics::ActiveModel {
        id: Set(a.id),
        date: Set(tz(a.date)),
        total_jobs: Set(a.total_jobs),
        completed_jobs: Set(a.completed_jobs),
        active_runners: Set(a.active_runners),
        revenue: Set(a.revenue),
        disputes: Set(a.disputes),
    }
}

fn collect<M, T>(rows: Vec<M>, f: impl Fn(M) -> StorageResult<T>) -> StorageResult<Vec<T>> {
    rows.into_iter().map(f).collect()
}

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn list_users(&self) -> StorageResult<Vec<User>> {
        let rows = user::Entity::find().order_by_asc(user::Column::Id).all(&self.db).await?;
        collect(rows, user_from)
    }

    async fn get_user(&self, id: i32) -> StorageResult<Option<User>> {
        user::Entity::find_by_id(id).one(&self.db).await?.map(user_from).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        models::user::find_by_email(&self.db, email.trim()).await?.map(user_from).transpose()
    }

    async fn create_user(&self, input: NewUserRecord) -> StorageResult<User> {
        let email = input.email.trim().to_string();
        if models::user::find_by_email(&self.db, &email).await?.is_some() {
            return Err(email_taken(&email));
        }
        let mut am = user_row(&input.into_user(0, Utc::now()));
        am.id = NotSet;
        let created = am.insert(&self.db).await.map_err(|e| unique_email_violation(e, &email))?;
        debug!(user_id = created.id, "user stored");
        user_from(created)
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> StorageResult<Option<User>> {
        let txn = self.db.begin().await?;
        let Some(current) = user::Entity::find_by_id(id).one(&txn).await? else { return Ok(None) };
        if let Some(email) = changes.email.as_deref().map(str::trim) {
            let clash = user::Entity::find()
                .filter(user::Column::Email.eq(email))
                .filter(user::Column::Id.ne(id))
                .one(&txn)
                .await?;
            if clash.is_some() {
                return Err(email_taken(email));
            }
        }
        let mut merged = user_from(current)?;
        merged.apply(changes);
        let email = merged.email.clone();
        let saved = user_row(&merged).update(&txn).await.map_err(|e| unique_email_violation(e, &email))?;
        txn.commit().await?;
        user_from(saved).map(Some)
    }

    async fn list_runners(&self) -> StorageResult<Vec<Runner>> {
        let rows = runner::Entity::find()
            .order_by_desc(runner::Column::CreatedAt)
            .order_by_desc(runner::Column::Id)
            .all(&self.db)
            .await?;
        collect(rows, runner_from)
    }

    async fn get_runner(&self, id: i32) -> StorageResult<Option<Runner>> {
        runner::Entity::find_by_id(id).one(&self.db).await?.map(runner_from).transpose()
    }

    async fn get_runner_by_user_id(&self, user_id: i32) -> StorageResult<Option<Runner>> {
        runner::Entity::find()
            .filter(runner::Column::UserId.eq(user_id))
            .order_by_asc(runner::Column::Id)
            .one(&self.db)
            .await?
            .map(runner_from)
            .transpose()
    }

    async fn create_runner(&self, input: NewRunner) -> StorageResult<Runner> {
        if !user_exists(&self.db, input.user_id).await? {
            return Err(missing_reference("userId", input.user_id));
        }
        let mut am = runner_row(&input.into_runner(0, Utc::now()));
        am.id = NotSet;
        runner_from(am.insert(&self.db).await?)
    }

    async fn update_runner(&self, id: i32, patch: RunnerUpdate) -> StorageResult<Option<Runner>> {
        let txn = self.db.begin().await?;
        let Some(current) = runner::Entity::find_by_id(id).one(&txn).await? else { return Ok(None) };
        let mut merged = runner_from(current)?;
        merged.apply(patch);
        let saved = runner_row(&merged).update(&txn).await?;
        txn.commit().await?;
        runner_from(saved).map(Some)
    }

    async fn pending_runners(&self) -> StorageResult<Vec<Runner>> {
        let rows = runner::Entity::find()
            .filter(runner::Column::VerificationStatus.eq(VerificationStatus::Pending.as_str()))
            .order_by_desc(runner::Column::CreatedAt)
            .order_by_desc(runner::Column::Id)
            .all(&self.db)
            .await?;
        collect(rows, runner_from)
    }

    async fn list_jobs(&self) -> StorageResult<Vec<Job>> {
        let rows = job::Entity::find()
            .order_by_desc(job::Column::CreatedAt)
            .order_by_desc(job::Column::Id)
            .all(&self.db)
            .await?;
        collect(rows, job_from)
    }

    async fn get_job(&self, id: i32) -> StorageResult<Option<Job>> {
        job::Entity::find_by_id(id).one(&self.db).await?.map(job_from).transpose()
    }

    async fn create_job(&self, input: NewJob) -> StorageResult<Job> {
        if !user_exists(&self.db, input.requester_id).await? {
            return Err(missing_reference("requesterId", input.requester_id));
        }
        if let Some(runner_id) = input.runner_id {
            if !user_exists(&self.db, runner_id).await? {
                return Err(missing_reference("runnerId", runner_id));
            }
        }
        let mut am = job_row(&input.into_job(0, Utc::now()));
        am.id = NotSet;
        let created = job_from(am.insert(&self.db).await?)?;
        debug!(job_id = created.id, status = %created.status, "job stored");
        Ok(created)
    }

    async fn update_job(&self, id: i32, patch: JobUpdate) -> StorageResult<Option<Job>> {
        let txn = self.db.begin().await?;
        let Some(current) = job::Entity::find_by_id(id).one(&txn).await? else { return Ok(None) };
        if let Some(requester_id) = patch.requester_id {
            if !user_exists(&txn, requester_id).await? {
                return Err(missing_reference("requesterId", requester_id));
            }
        }
        if let Some(runner_id) = patch.runner_id.flatten() {
            if !user_exists(&txn, runner_id).await? {
                return Err(missing_reference("runnerId", runner_id));
            }
        }
        let mut merged = job_from(current)?;
        merged.apply(patch, Utc::now());
        let saved = job_row(&merged).update(&txn).await?;
        txn.commit().await?;
        job_from(saved).map(Some)
    }

    async fn jobs_by_status(&self, status: JobStatus) -> StorageResult<Vec<Job>> {
        let rows = job::Entity::find()
            .filter(job::Column::Status.eq(status.as_str()))
            .order_by_desc(job::Column::CreatedAt)
            .order_by_desc(job::Column::Id)
            .all(&self.db)
            .await?;
        collect(rows, job_from)
    }

    async fn recent_jobs(&self, limit: usize) -> StorageResult<Vec<Job>> {
        let rows = job::Entity::find()
            .order_by_desc(job::Column::CreatedAt)
            .order_by_desc(job::Column::Id)
            .limit(limit as u64)
            .all(&self.db)
            .await?;
        collect(rows, job_from)
    }

    async fn list_services(&self) -> StorageResult<Vec<Service>> {
        let rows = catalog::Entity::find()
            .order_by_asc(catalog::Column::Name)
            .order_by_asc(catalog::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(service_from).collect())
    }

    async fn get_service(&self, id: i32) -> StorageResult<Option<Service>> {
        Ok(catalog::Entity::find_by_id(id).one(&self.db).await?.map(service_from))
    }

    async fn create_service(&self, input: NewService) -> StorageResult<Service> {
        let mut am = service_row(&input.into_service(0, Utc::now()));
        am.id = NotSet;
        Ok(service_from(am.insert(&self.db).await?))
    }

    async fn update_service(&self, id: i32, patch: ServiceUpdate) -> StorageResult<Option<Service>> {
        let txn = self.db.begin().await?;
        let Some(current) = catalog::Entity::find_by_id(id).one(&txn).await? else { return Ok(None) };
        let mut merged = service_from(current);
        merged.apply(patch);
        let saved = service_row(&merged).update(&txn).await?;
        txn.commit().await?;
        Ok(Some(service_from(saved)))
    }

    async fn delete_service(&self, id: i32) -> StorageResult<bool> {
        let res = catalog::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list_subscriptions(&self) -> StorageResult<Vec<Subscription>> {
        let rows = subscription::Entity::find()
            .order_by_desc(subscription::Column::StartDate)
            .order_by_desc(subscription::Column::Id)
            .all(&self.db)
            .await?;
        collect(rows, subscription_from)
    }

    async fn get_subscription(&self, id: i32) -> StorageResult<Option<Subscription>> {
        subscription::Entity::find_by_id(id).one(&self.db).await?.map(subscription_from).transpose()
    }

    async fn get_subscription_by_user_id(&self, user_id: i32) -> StorageResult<Option<Subscription>> {
        subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::Status.eq(SubscriptionStatus::Active.as_str()))
            .order_by_desc(subscription::Column::StartDate)
            .order_by_desc(subscription::Column::Id)
            .one(&self.db)
            .await?
            .map(subscription_from)
            .transpose()
    }

    async fn create_subscription(&self, input: NewSubscription) -> StorageResult<Subscription> {
        if !user_exists(&self.db, input.user_id).await? {
            return Err(missing_reference("userId", input.user_id));
        }
        let mut am = subscription_row(&input.into_subscription(0, Utc::now()));
        am.id = NotSet;
        subscription_from(am.insert(&self.db).await?)
    }

    async fn update_subscription(&self, id: i32, patch: SubscriptionUpdate) -> StorageResult<Option<Subscription>> {
        let txn = self.db.begin().await?;
        let Some(current) = subscription::Entity::find_by_id(id).one(&txn).await? else { return Ok(None) };
        let mut merged = subscription_from(current)?;
        merged.apply(patch)?;
        let saved = subscription_row(&merged).update(&txn).await?;
        txn.commit().await?;
        subscription_from(saved).map(Some)
    }

    async fn list_disputes(&self) -> StorageResult<Vec<Dispute>> {
        let rows = dispute::Entity::find()
            .order_by_desc(dispute::Column::CreatedAt)
            .order_by_desc(dispute::Column::Id)
            .all(&self.db)
            .await?;
        collect(rows, dispute_from)
    }

    async fn get_dispute(&self, id: i32) -> StorageResult<Option<Dispute>> {
        dispute::Entity::find_by_id(id).one(&self.db).await?.map(dispute_from).transpose()
    }

    async fn create_dispute(&self, input: NewDispute) -> StorageResult<Dispute> {
        if job::Entity::find_by_id(input.job_id).one(&self.db).await?.is_none() {
            return Err(missing_reference("jobId", input.job_id));
        }
        if !user_exists(&self.db, input.reporter_id).await? {
            return Err(missing_reference("reporterId", input.reporter_id));
        }
        let mut am = dispute_row(&input.into_dispute(0, Utc::now()));
        am.id = NotSet;
        dispute_from(am.insert(&self.db).await?)
    }

    async fn update_dispute(&self, id: i32, patch: DisputeUpdate) -> StorageResult<Option<Dispute>> {
        let txn = self.db.begin().await?;
        let Some(current) = dispute::Entity::find_by_id(id).one(&txn).await? else { return Ok(None) };
        let mut merged = dispute_from(current)?;
        merged.apply(patch, Utc::now());
        let saved = dispute_row(&merged).update(&txn).await?;
        txn.commit().await?;
        dispute_from(saved).map(Some)
    }

    async fn open_disputes(&self) -> StorageResult<Vec<Dispute>> {
        let rows = dispute::Entity::find()
            .filter(dispute::Column::Status.eq(DisputeStatus::Open.as_str()))
            .order_by_desc(dispute::Column::CreatedAt)
            .order_by_desc(dispute::Column::Id)
            .all(&self.db)
            .await?;
        collect(rows, dispute_from)
    }

    async fn list_analytics(&self) -> StorageResult<Vec<Analytics>> {
        let rows = analytics::Entity::find()
            .order_by_desc(analytics::Column::Date)
            .order_by_desc(analytics::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(analytics_from).collect())
    }

    async fn create_analytics(&self, input: NewAnalytics) -> StorageResult<Analytics> {
        let mut am = analytics_row(&input.into_analytics(0, Utc::now()));
        am.id = NotSet;
        Ok(analytics_from(am.insert(&self.db).await?))
    }

    async fn latest_analytics(&self) -> StorageResult<Option<Analytics>> {
        let row = analytics::Entity::find()
            .order_by_desc(analytics::Column::Date)
            .order_by_desc(analytics::Column::Id)
            .one(&self.db)
            .await?;
        Ok(row.map(analytics_from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::test_support::{db_tests_disabled, get_db, new_job, new_user, unique_email};

    #[tokio::test]
    async fn job_lifecycle_against_postgres() -> Result<(), anyhow::Error> {
        if db_tests_disabled() {
            return Ok(());
        }
        let store = SeaOrmStorage::new(get_db().await?);
        let user = store.create_user(new_user(&unique_email("sea_job"), Role::Requester)).await?;

        let job = store.create_job(new_job(user.id, "Pharmacy run")).await?;
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.price.to_string(), "15.00");

        let done = store
            .update_job(job.id, JobUpdate { status: Some(JobStatus::Completed), ..Default::default() })
            .await?
            .expect("job exists");
        let stamped = done.completed_at.expect("completedAt set");
        let again = store
            .update_job(job.id, JobUpdate { status: Some(JobStatus::Completed), ..Default::default() })
            .await?
            .expect("job exists");
        assert_eq!(again.completed_at, Some(stamped));

        let recent = store.recent_jobs(1).await?;
        assert_eq!(recent.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() -> Result<(), anyhow::Error> {
        if db_tests_disabled() {
            return Ok(());
        }
        let store = SeaOrmStorage::new(get_db().await?);
        let email = unique_email("sea_dup");
        store.create_user(new_user(&email, Role::Requester)).await?;
        let err = store.create_user(new_user(&email, Role::Admin)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(store.get_user_by_email(&email).await?.map(|u| u.role), Some(Role::Requester));
        Ok(())
    }

    #[tokio::test]
    async fn missing_rows_are_none_not_errors() -> Result<(), anyhow::Error> {
        if db_tests_disabled() {
            return Ok(());
        }
        let store = SeaOrmStorage::new(get_db().await?);
        assert!(store.get_job(i32::MAX).await?.is_none());
        assert!(store.update_runner(i32::MAX, RunnerUpdate::default()).await?.is_none());
        assert!(!store.delete_service(i32::MAX).await?);
        Ok(())
    }
}
