use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::ServiceError;

/// Largest value a `numeric(10, 2)` money column holds: 99999999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Collects every validation problem before failing.
#[derive(Debug, Default)]
pub struct Problems(Vec<String>);

impl Problems {
    pub fn new() -> Self { Self::default() }

    pub fn check(&mut self, ok: bool, msg: impl Into<String>) -> &mut Self {
        if !ok {
            self.0.push(msg.into());
        }
        self
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), format!("{field} is required"))
    }

    /// Like `required`, for patch fields that are only checked when present.
    pub fn not_blank(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) => self.required(field, v),
            None => self,
        }
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(value.contains('@'), format!("{field} must be a valid email address"))
    }

    pub fn password(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(value.chars().count() >= 8, format!("{field} must be at least 8 characters"))
    }

    /// Money amounts: non-negative and within a `numeric(10, 2)` column.
    pub fn amount(&mut self, field: &str, value: Option<Decimal>) -> &mut Self {
        match value {
            Some(v) => self
                .check(v >= Decimal::ZERO, format!("{field} must not be negative"))
                .check(v <= MAX_AMOUNT, format!("{field} must not exceed {MAX_AMOUNT}")),
            None => self,
        }
    }

    pub fn non_negative_count(&mut self, field: &str, value: Option<i32>) -> &mut Self {
        match value {
            Some(v) => self.check(v >= 0, format!("{field} must not be negative")),
            None => self,
        }
    }

    pub fn positive_id(&mut self, field: &str, value: Option<i32>) -> &mut Self {
        match value {
            Some(v) => self.check(v > 0, format!("{field} must be a positive id")),
            None => self,
        }
    }

    pub fn latitude(&mut self, field: &str, value: Option<Decimal>) -> &mut Self {
        match value {
            Some(v) => self.check(v >= Decimal::from(-90) && v <= Decimal::from(90), format!("{field} must be between -90 and 90")),
            None => self,
        }
    }

    pub fn longitude(&mut self, field: &str, value: Option<Decimal>) -> &mut Self {
        match value {
            Some(v) => self.check(v >= Decimal::from(-180) && v <= Decimal::from(180), format!("{field} must be between -180 and 180")),
            None => self,
        }
    }

    pub fn not_past(&mut self, field: &str, value: Option<DateTime<Utc>>, now: DateTime<Utc>) -> &mut Self {
        match value {
            Some(v) => self.check(v >= now, format!("{field} must not be in the past")),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn finish(&mut self) -> Result<(), ServiceError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(std::mem::take(&mut self.0)))
        }
    }
}

/// Money columns are `numeric(10, 2)`.
pub fn money(value: Decimal) -> Decimal {
    let mut v = value.round_dp(2);
    v.rescale(2);
    v
}

/// Coordinate columns keep eight fractional digits.
pub fn coordinate(value: Decimal) -> Decimal {
    let mut v = value.round_dp(8);
    v.rescale(8);
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn collects_all_problems() {
        let err = Problems::new()
            .required("title", "  ")
            .email("email", "nope")
            .amount("price", Some(Decimal::from(-1)))
            .latitude("pickupLat", Some(Decimal::from(91)))
            .finish()
            .unwrap_err();
        match err {
            ServiceError::Validation(list) => assert_eq!(list.len(), 4),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn amounts_are_bounded_by_the_column() {
        assert_eq!(MAX_AMOUNT.to_string(), "99999999.99");
        assert!(Problems::new().amount("price", Some(MAX_AMOUNT)).finish().is_ok());
        let huge = Decimal::from_str("70000000000000000000000000000").unwrap();
        let err = Problems::new().amount("price", Some(huge)).finish().unwrap_err();
        assert_eq!(err.to_string(), "validation error: price must not exceed 99999999.99");
    }

    #[test]
    fn absent_optional_values_pass() {
        assert!(Problems::new().amount("p", None).longitude("l", None).finish().is_ok());
    }

    #[test]
    fn money_has_two_fraction_digits() {
        assert_eq!(money(Decimal::from(10)).to_string(), "10.00");
        assert_eq!(money(Decimal::from_str("2.5").unwrap()).to_string(), "2.50");
        assert_eq!(money(Decimal::from_str("1.005").unwrap()).to_string(), "1.00");
        assert_eq!(coordinate(Decimal::from_str("6.5").unwrap()).to_string(), "6.50000000");
    }
}
