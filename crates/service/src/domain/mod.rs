//! Domain records, create inputs and patch types for the seven marketplace
//! entities.
//!
//! Records are what the API returns. `New*` types are what clients post; their
//! `validate()` reports every problem at once. `*Update` types carry only the
//! fields a client may change, and nullable columns use `Option<Option<T>>` so
//! an explicit `null` clears the value while an absent field leaves it alone.
//! Unknown JSON fields are ignored so clients may echo whole records back.

pub mod validation;
pub mod enums;
pub mod user;
pub mod runner;
pub mod job;
pub mod catalog;
pub mod subscription;
pub mod dispute;
pub mod analytics;

pub use analytics::{Analytics, NewAnalytics};
pub use catalog::{NewService, Service, ServiceUpdate};
pub use dispute::{Dispute, DisputeUpdate, NewDispute};
pub use enums::{DisputeStatus, JobStatus, Role, SubscriptionPlan, SubscriptionStatus, VerificationStatus};
pub use job::{Job, JobUpdate, NewJob};
pub use runner::{NewRunner, Runner, RunnerUpdate, RunnerVerification};
pub use subscription::{NewSubscription, Subscription, SubscriptionUpdate};
pub use user::{NewUser, NewUserRecord, User, UserChanges, UserUpdate};

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
/// Pair with `#[serde(default)]`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}
