use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Declares a closed set of lower snake case wire values. `as_str` and
/// `FromStr` are what the database backend stores and reads back.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name { $($(#[$vmeta])* $variant),+ }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self { $($name::$variant => $text),+ }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
        }

        impl std::str::FromStr for $name {
            type Err = ServiceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ServiceError::invalid(format!("unknown {} `{}`", stringify!($name), other))),
                }
            }
        }
    };
}

wire_enum! {
    #[derive(Default)]
    Role {
        Admin => "admin",
        #[default]
        Requester => "requester",
        Runner => "runner",
    }
}

wire_enum! {
    /// Runner vetting state.
    #[derive(Default)]
    VerificationStatus {
        #[default]
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

wire_enum! {
    #[derive(Default)]
    JobStatus {
        #[default]
        Pending => "pending",
        Assigned => "assigned",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

wire_enum! {
    SubscriptionPlan {
        Basic => "basic",
        Premium => "premium",
        Business => "business",
    }
}

wire_enum! {
    #[derive(Default)]
    SubscriptionStatus {
        #[default]
        Active => "active",
        Cancelled => "cancelled",
        PastDue => "past_due",
    }
}

wire_enum! {
    #[derive(Default)]
    DisputeStatus {
        #[default]
        Open => "open",
        Investigating => "investigating",
        Resolved => "resolved",
        Closed => "closed",
    }
}

impl JobStatus {
    /// Chart label used by the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::Assigned => "Assigned",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
            JobStatus::Cancelled => "Cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_text_matches_serde() {
        for s in JobStatus::ALL {
            let json = serde_json::to_string(s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.as_str()));
            assert_eq!(s.as_str().parse::<JobStatus>().unwrap(), *s);
        }
        assert_eq!(serde_json::to_string(&SubscriptionStatus::PastDue).unwrap(), "\"past_due\"");
    }

    #[test]
    fn defaults_follow_the_schema() {
        assert_eq!(Role::default(), Role::Requester);
        assert_eq!(VerificationStatus::default(), VerificationStatus::Pending);
        assert_eq!(JobStatus::default(), JobStatus::Pending);
        assert_eq!(SubscriptionStatus::default(), SubscriptionStatus::Active);
        assert_eq!(DisputeStatus::default(), DisputeStatus::Open);
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!("done".parse::<JobStatus>().is_err());
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }
}
