use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::double_option;
use super::enums::{SubscriptionPlan, SubscriptionStatus};
use super::validation::{money, Problems};
use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i32,
    pub user_id: i32,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub monthly_price: Decimal,
    pub errands_used: i32,
    pub errands_limit: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub user_id: i32,
    pub plan: SubscriptionPlan,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub monthly_price: Decimal,
    #[serde(default)]
    pub errands_used: i32,
    pub errands_limit: i32,
}

impl NewSubscription {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ServiceError> {
        Problems::new()
            .positive_id("userId", Some(self.user_id))
            .amount("monthlyPrice", Some(self.monthly_price))
            .non_negative_count("errandsUsed", Some(self.errands_used))
            .non_negative_count("errandsLimit", Some(self.errands_limit))
            .check(self.errands_used <= self.errands_limit, "errandsUsed must not exceed errandsLimit")
            .not_past("endDate", self.end_date, now)
            .finish()
    }

    /// `startDate` is the creation time.
    pub fn into_subscription(self, id: i32, now: DateTime<Utc>) -> Subscription {
        Subscription {
            id,
            user_id: self.user_id,
            plan: self.plan,
            status: self.status,
            start_date: now,
            end_date: self.end_date,
            monthly_price: money(self.monthly_price),
            errands_used: self.errands_used,
            errands_limit: self.errands_limit,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdate {
    pub plan: Option<SubscriptionPlan>,
    pub status: Option<SubscriptionStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub monthly_price: Option<Decimal>,
    pub errands_used: Option<i32>,
    pub errands_limit: Option<i32>,
}

impl SubscriptionUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Problems::new()
            .amount("monthlyPrice", self.monthly_price)
            .non_negative_count("errandsUsed", self.errands_used)
            .non_negative_count("errandsLimit", self.errands_limit)
            .finish()
    }
}

impl Subscription {
    /// Merge a patch; the merged record must still satisfy `errandsUsed <= errandsLimit`.
    /// On error `self` is left untouched.
    pub fn apply(&mut self, patch: SubscriptionUpdate) -> Result<(), ServiceError> {
        let mut next = self.clone();
        if let Some(v) = patch.plan { next.plan = v; }
        if let Some(v) = patch.status { next.status = v; }
        if let Some(v) = patch.end_date { next.end_date = v; }
        if let Some(v) = patch.monthly_price { next.monthly_price = money(v); }
        if let Some(v) = patch.errands_used { next.errands_used = v; }
        if let Some(v) = patch.errands_limit { next.errands_limit = v; }
        Problems::new()
            .check(next.errands_used <= next.errands_limit, "errandsUsed must not exceed errandsLimit")
            .finish()?;
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn premium(now: DateTime<Utc>) -> Subscription {
        NewSubscription {
            user_id: 3,
            plan: SubscriptionPlan::Premium,
            status: SubscriptionStatus::Active,
            end_date: Some(now + Duration::days(30)),
            monthly_price: Decimal::new(2999, 2),
            errands_used: 0,
            errands_limit: 20,
        }
        .into_subscription(1, now)
    }

    #[test]
    fn end_date_in_past_is_rejected() {
        let now = Utc::now();
        let input: NewSubscription = serde_json::from_value(json!({
            "userId": 1, "plan": "basic", "monthlyPrice": "9.99", "errandsLimit": 5,
            "errandsUsed": 6, "endDate": (now - Duration::days(1)).to_rfc3339()
        }))
        .unwrap();
        match input.validate(now).unwrap_err() {
            ServiceError::Validation(list) => assert_eq!(list.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn patch_that_breaks_errand_limit_is_refused() {
        let now = Utc::now();
        let mut sub = premium(now);
        assert!(sub.apply(SubscriptionUpdate { errands_used: Some(21), ..Default::default() }).is_err());
        assert_eq!(sub.errands_used, 0);

        sub.apply(SubscriptionUpdate { errands_used: Some(20), status: Some(SubscriptionStatus::PastDue), ..Default::default() })
            .unwrap();
        assert_eq!(sub.errands_used, 20);
        assert_eq!(sub.status, SubscriptionStatus::PastDue);
        assert_eq!(sub.start_date, now);
    }
}
