use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{money, Problems};
use crate::errors::ServiceError;

/// Point-in-time dashboard totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub total_jobs: i32,
    pub completed_jobs: i32,
    pub active_runners: i32,
    pub revenue: Decimal,
    pub disputes: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewAnalytics {
    pub total_jobs: i32,
    pub completed_jobs: i32,
    pub active_runners: i32,
    pub revenue: Decimal,
    pub disputes: i32,
}

impl NewAnalytics {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Problems::new()
            .non_negative_count("totalJobs", Some(self.total_jobs))
            .non_negative_count("completedJobs", Some(self.completed_jobs))
            .non_negative_count("activeRunners", Some(self.active_runners))
            .amount("revenue", Some(self.revenue))
            .non_negative_count("disputes", Some(self.disputes))
            .finish()
    }

    /// `date` is the capture time.
    pub fn into_analytics(self, id: i32, now: DateTime<Utc>) -> Analytics {
        Analytics {
            id,
            date: now,
            total_jobs: self.total_jobs,
            completed_jobs: self.completed_jobs,
            active_runners: self.active_runners,
            revenue: money(self.revenue),
            disputes: self.disputes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_all_zero() {
        let input: NewAnalytics = serde_json::from_str("{}").unwrap();
        assert!(input.validate().is_ok());
        let a = input.into_analytics(1, Utc::now());
        assert_eq!(a.total_jobs, 0);
        assert_eq!(serde_json::to_value(&a).unwrap()["revenue"], "0.00");
    }

    #[test]
    fn negative_counters_are_rejected() {
        let input = NewAnalytics { total_jobs: -1, disputes: -2, ..Default::default() };
        assert!(matches!(input.validate(), Err(ServiceError::Validation(v)) if v.len() == 2));
    }
}
