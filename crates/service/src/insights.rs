//! Dashboard aggregates computed from current storage contents.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::validation::money;
use crate::domain::{Analytics, Dispute, Job, JobStatus, NewAnalytics, Runner, VerificationStatus};
use crate::errors::ServiceError;
use crate::storage::Storage;

const MONTH_LABELS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Display order of the job status chart.
const STATUS_ORDER: [JobStatus; 5] =
    [JobStatus::Completed, JobStatus::InProgress, JobStatus::Pending, JobStatus::Assigned, JobStatus::Cancelled];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

pub async fn job_status_breakdown<S: Storage + ?Sized>(store: &S) -> Result<Vec<StatusCount>, ServiceError> {
    let jobs = store.list_jobs().await?;
    Ok(STATUS_ORDER
        .iter()
        .map(|status| StatusCount {
            status: status.label().to_string(),
            count: jobs.iter().filter(|j| j.status == *status).count() as u64,
        })
        .collect())
}

/// Revenue of completed jobs bucketed by completion month, oldest month first,
/// ending with the month containing `now`.
pub async fn monthly_revenue<S: Storage + ?Sized>(
    store: &S,
    months: u32,
    now: DateTime<Utc>,
) -> Result<Vec<MonthlyRevenue>, ServiceError> {
    let completed = store.jobs_by_status(JobStatus::Completed).await?;
    revenue_by_month(&completed, months, now)
}

/// Overflow is reported instead of panicking inside `Decimal`'s `Add`.
fn total<I: IntoIterator<Item = Decimal>>(amounts: I) -> Result<Decimal, ServiceError> {
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| ServiceError::invalid("revenue total is out of range"))
    })
}

fn revenue_by_month(jobs: &[Job], months: u32, now: DateTime<Utc>) -> Result<Vec<MonthlyRevenue>, ServiceError> {
    let current = now.year() * 12 + now.month0() as i32;
    (0..months as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            let (year, month0) = (index.div_euclid(12), index.rem_euclid(12) as u32);
            let revenue = total(
                jobs.iter()
                    .filter_map(|j| j.completed_at.map(|at| (at, j.price)))
                    .filter(|(at, _)| at.year() == year && at.month0() == month0)
                    .map(|(_, price)| price),
            )?;
            Ok(MonthlyRevenue { month: MONTH_LABELS[month0 as usize].to_string(), revenue: money(revenue) })
        })
        .collect()
}

fn count(n: usize) -> i32 { i32::try_from(n).unwrap_or(i32::MAX) }

/// Totals for a snapshot: completed jobs and their revenue, approved runners, all disputes.
pub fn summarize(jobs: &[Job], runners: &[Runner], disputes: &[Dispute]) -> Result<NewAnalytics, ServiceError> {
    let completed: Vec<&Job> = jobs.iter().filter(|j| j.status == JobStatus::Completed).collect();
    Ok(NewAnalytics {
        total_jobs: count(jobs.len()),
        completed_jobs: count(completed.len()),
        active_runners: count(runners.iter().filter(|r| r.verification_status == VerificationStatus::Approved).count()),
        revenue: money(total(completed.iter().map(|j| j.price))?),
        disputes: count(disputes.len()),
    })
}

/// Store a snapshot of the current totals. A revenue total the analytics
/// column cannot hold is rejected on every backend.
pub async fn capture_snapshot<S: Storage + ?Sized>(store: &S) -> Result<Analytics, ServiceError> {
    let jobs = store.list_jobs().await?;
    let runners = store.list_runners().await?;
    let disputes = store.list_disputes().await?;
    let summary = summarize(&jobs, &runners, &disputes)?;
    summary.validate()?;
    let snapshot = store.create_analytics(summary).await?;
    info!(
        analytics_id = snapshot.id,
        total_jobs = snapshot.total_jobs,
        completed_jobs = snapshot.completed_jobs,
        revenue = %snapshot.revenue,
        "analytics snapshot captured"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobUpdate, Role};
    use crate::storage::MemStorage;
    use crate::test_support::{new_job, new_user};
    use chrono::TimeZone;

    #[tokio::test]
    async fn breakdown_has_fixed_order_and_real_counts() {
        let store = MemStorage::new();
        let user = store.create_user(new_user("r@example.com", Role::Requester)).await.unwrap();
        for _ in 0..3 {
            store.create_job(new_job(user.id, "errand")).await.unwrap();
        }
        store.update_job(1, JobUpdate { status: Some(JobStatus::Completed), ..Default::default() }).await.unwrap();

        let rows = job_status_breakdown(&store).await.unwrap();
        let labels: Vec<&str> = rows.iter().map(|r| r.status.as_str()).collect();
        assert_eq!(labels, vec!["Completed", "In Progress", "Pending", "Assigned", "Cancelled"]);
        assert_eq!(rows[0].count, 1);
        assert_eq!(rows[2].count, 2);
        assert_eq!(rows[4].count, 0);
    }

    fn completed_job(price: i64, at: DateTime<Utc>) -> Job {
        let mut job = new_job(1, "done").into_job(1, at);
        job.price = Decimal::new(price, 2);
        job.status = JobStatus::Completed;
        job.completed_at = Some(at);
        job
    }

    #[test]
    fn revenue_buckets_cross_year_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap();
        let jobs = vec![
            completed_job(1000, Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap()),
            completed_job(550, Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap()),
            completed_job(2000, Utc.with_ymd_and_hms(2023, 12, 24, 9, 0, 0).unwrap()),
            completed_job(9900, Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap()),
        ];
        let rows = revenue_by_month(&jobs, 3, now).unwrap();
        let labels: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(labels, vec!["Dec", "Jan", "Feb"]);
        assert_eq!(rows[0].revenue.to_string(), "20.00");
        assert_eq!(rows[1].revenue.to_string(), "0.00");
        assert_eq!(rows[2].revenue.to_string(), "15.50");
        assert_eq!(serde_json::to_value(&rows[2]).unwrap()["revenue"], serde_json::json!(15.5));
    }

    #[test]
    fn oversized_totals_are_errors_not_panics() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap();
        let mut jobs = vec![completed_job(0, now), completed_job(0, now)];
        for job in &mut jobs {
            job.price = Decimal::MAX;
        }
        assert!(matches!(revenue_by_month(&jobs, 1, now), Err(ServiceError::Validation(_))));
        assert!(matches!(summarize(&jobs, &[], &[]), Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn snapshot_over_column_limit_is_rejected() {
        let store = MemStorage::new();
        let user = store.create_user(new_user("big@example.com", Role::Requester)).await.unwrap();
        for title in ["a", "b"] {
            let mut input = new_job(user.id, title);
            input.price = crate::domain::validation::MAX_AMOUNT;
            let job = store.create_job(input).await.unwrap();
            store.update_job(job.id, JobUpdate { status: Some(JobStatus::Completed), ..Default::default() }).await.unwrap();
        }
        let err = capture_snapshot(&store).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref v) if v[0].starts_with("revenue must not exceed")));
        assert!(store.latest_analytics().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn snapshot_reflects_state() {
        let store = MemStorage::new();
        let user = store.create_user(new_user("s@example.com", Role::Requester)).await.unwrap();
        let job = store.create_job(new_job(user.id, "a")).await.unwrap();
        store.create_job(new_job(user.id, "b")).await.unwrap();
        store.update_job(job.id, JobUpdate { status: Some(JobStatus::Completed), ..Default::default() }).await.unwrap();

        let snap = capture_snapshot(&store).await.unwrap();
        assert_eq!(snap.total_jobs, 2);
        assert_eq!(snap.completed_jobs, 1);
        assert_eq!(snap.revenue.to_string(), "15.00");
        assert_eq!(store.latest_analytics().await.unwrap().map(|a| a.id), Some(snap.id));
    }
}
