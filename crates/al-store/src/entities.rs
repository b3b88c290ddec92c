//! Typed enum domains and table names of the marketplace.
//!
//! The store validates enum columns against the registry at write time;
//! these types give application code a compile-time view of the same
//! domains as they stand after every unit.

use std::fmt;
use std::str::FromStr;

/// Define a closed string enum mirroring an enum domain in the schema.
///
/// Generates `as_str()`, `ALL`, `DOMAIN`, `Display`, and `FromStr`.
macro_rules! define_domain_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $Name:ident in $domain:literal {
            $($Variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $Name {
            $($Variant),+
        }

        impl $Name {
            /// Name of the enum domain in the schema registry.
            pub const DOMAIN: &'static str = $domain;

            /// Every value, in declaration order.
            pub const ALL: &'static [$Name] = &[$($Name::$Variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($Name::$Variant => $value),+
                }
            }
        }

        impl fmt::Display for $Name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $Name {
            type Err = UnknownEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($Name::$Variant),)+
                    other => Err(UnknownEnumValue {
                        domain: $domain,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl From<$Name> for al_db::Value {
            fn from(v: $Name) -> Self {
                al_db::Value::Text(v.as_str().to_string())
            }
        }
    };
}

/// A string that is not a member of the named domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEnumValue {
    pub domain: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownEnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a value of {}", self.value, self.domain)
    }
}

impl std::error::Error for UnknownEnumValue {}

define_domain_enum! {
    pub enum UserRole in "user_role" {
        User => "user",
        Admin => "admin",
        Repair => "repair",
        Insurance => "insurance",
        Dealer => "dealer",
        Detailer => "detailer",
    }
}

define_domain_enum! {
    pub enum VehicleStatus in "vehicle_status" {
        Live => "live",
        Draft => "draft",
        Sold => "sold",
    }
}

define_domain_enum! {
    pub enum ReferralJobType in "referral_job_type" {
        Repair => "repair",
        Insurance => "insurance",
        Detailer => "detailer",
    }
}

define_domain_enum! {
    /// Lifecycle of a referral. Only `InProgress -> Completed` is allowed.
    pub enum ReferralStatus in "referral_status" {
        InProgress => "inprogress",
        Completed => "completed",
    }
}

define_domain_enum! {
    pub enum PackageCategory in "package_category" {
        Dealer => "dealer",
        Insurance => "insurance",
        Repair => "repair",
        Detailer => "detailer",
    }
}

define_domain_enum! {
    pub enum AdType in "ad_type" {
        Featured => "featured",
        Sponsored => "sponsored",
        Base => "base",
    }
}

define_domain_enum! {
    pub enum PauseReason in "pause_reason" {
        User => "user",
        Budget => "budget",
        System => "system",
        None => "none",
    }
}

impl ReferralStatus {
    pub fn can_transition_to(self, next: ReferralStatus) -> bool {
        matches!(
            (self, next),
            (ReferralStatus::InProgress, ReferralStatus::Completed)
        )
    }
}

/// Physical table names.
pub mod tables {
    pub const USERS: &str = "users";
    pub const CONVERSATIONS: &str = "conversations";
    pub const MESSAGES: &str = "messages";
    pub const VEHICLES: &str = "vehicles";
    pub const REPORTED_CONTENTS: &str = "reported_contents";
    pub const REVIEWS: &str = "reviews";
    pub const TEST_DRIVE_REQUESTS: &str = "test_drive_requests";
    pub const PACKAGES: &str = "packages";
    pub const SUBSCRIPTIONS: &str = "subscriptions";
    pub const REFERRALS: &str = "referrals";
    pub const WALLETS: &str = "wallets";
    pub const ADVERTISEMENTS: &str = "advertisements";
    pub const NOTIFICATIONS: &str = "notifications";
}

#[cfg(test)]
#[path = "entities_test.rs"]
mod tests;
