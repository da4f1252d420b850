//! Query window helpers for list endpoints that take a size parameter.

use crate::errors::ServiceError;

/// `?limit=` for the recent-jobs feed.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecentLimit {
    pub limit: Option<u32>,
}

impl RecentLimit {
    pub const DEFAULT: u32 = 10;
    pub const MAX: u32 = 100;

    /// Clamp to `1..=MAX`, defaulting when absent.
    pub fn normalize(self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT).clamp(1, Self::MAX) as usize
    }
}

/// `?months=` for the revenue chart.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonthsWindow {
    pub months: Option<u32>,
}

impl MonthsWindow {
    pub const DEFAULT: u32 = 6;
    pub const MAX: u32 = 24;

    /// Out-of-range values are a validation error rather than silently clamped.
    pub fn validate(self) -> Result<u32, ServiceError> {
        let months = self.months.unwrap_or(Self::DEFAULT);
        if (1..=Self::MAX).contains(&months) {
            Ok(months)
        } else {
            Err(ServiceError::invalid(format!("months must be between 1 and {}", Self::MAX)))
        }
    }
}
