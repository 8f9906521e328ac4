use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// One subscriber record. Created elsewhere; this crate only mutates plan,
/// credit and blacklist fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: Option<String>,
    pub phone_number: String,
    pub user_type: UserType,
    #[serde(with = "chrono::serde::ts_seconds_option", default)]
    pub plan_expiry: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_seconds_option", default)]
    pub next_renewal: Option<DateTime<Utc>>,
    #[serde(default)]
    pub monthly_credits: i64,
    #[serde(default)]
    pub trial_used: bool,
    #[serde(with = "chrono::serde::ts_seconds_option", default)]
    pub trial_started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub blacklisted: bool,
    #[serde(with = "chrono::serde::ts_seconds_option", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_seconds_option", default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Agent {
    /// A fresh basic-tier record with nothing else set. Mostly useful for
    /// seeding stores in tests.
    pub fn new(id: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            phone_number: phone_number.into(),
            user_type: UserType::Basic,
            plan_expiry: None,
            next_renewal: None,
            monthly_credits: 0,
            trial_used: false,
            trial_started_at: None,
            blacklisted: false,
            updated_at: None,
            last_modified: None,
        }
    }

    /// Returns a copy with `update` merged over it, the way the store applies
    /// a partial write.
    pub fn with_update(&self, update: &AgentUpdate) -> Self {
        let mut next = self.clone();
        if let Some(user_type) = update.user_type {
            next.user_type = user_type;
        }
        if let Some(ts) = update.plan_expiry {
            next.plan_expiry = Some(ts);
        }
        if let Some(ts) = update.next_renewal {
            next.next_renewal = Some(ts);
        }
        if let Some(credits) = update.monthly_credits {
            next.monthly_credits = credits;
        }
        if let Some(used) = update.trial_used {
            next.trial_used = used;
        }
        if let Some(ts) = update.trial_started_at {
            next.trial_started_at = Some(ts);
        }
        if let Some(blacklisted) = update.blacklisted {
            next.blacklisted = blacklisted;
        }
        if let Some(ts) = update.updated_at {
            next.updated_at = Some(ts);
        }
        if let Some(ts) = update.last_modified {
            next.last_modified = Some(ts);
        }
        next
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserType {
    Basic,
    Trial,
    Premium,
}

/// Row of the plan table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSpec {
    pub expiry_days: i64,
    pub monthly_credits: i64,
    pub validity_label: &'static str,
}

impl UserType {
    pub fn spec(self) -> PlanSpec {
        match self {
            UserType::Premium => PlanSpec {
                expiry_days: 365,
                monthly_credits: 100,
                validity_label: "1 Year",
            },
            UserType::Trial => PlanSpec {
                expiry_days: 30,
                monthly_credits: 100,
                validity_label: "30 Days",
            },
            UserType::Basic => PlanSpec {
                expiry_days: 30,
                monthly_credits: 5,
                validity_label: "30 Days",
            },
        }
    }

    /// Capitalized name for listings ("Premium").
    pub fn title(self) -> &'static str {
        match self {
            UserType::Basic => "Basic",
            UserType::Trial => "Trial",
            UserType::Premium => "Premium",
        }
    }

    /// Catalog order used by operator listings: premium first.
    pub fn catalog() -> Vec<UserType> {
        let mut plans: Vec<UserType> = UserType::iter().collect();
        plans.reverse();
        plans
    }

    pub fn allowed_names() -> Vec<String> {
        UserType::iter().map(|t| t.to_string()).collect()
    }
}

/// Partial write against an [`Agent`]. `None` fields are left untouched by
/// the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentUpdate {
    #[serde(
        with = "chrono::serde::ts_seconds_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_renewal: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(
        with = "chrono::serde::ts_seconds_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub plan_expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_credits: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_used: Option<bool>,
    #[serde(
        with = "chrono::serde::ts_seconds_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub trial_started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklisted: Option<bool>,
    #[serde(
        with = "chrono::serde::ts_seconds_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(
        with = "chrono::serde::ts_seconds_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<DateTime<Utc>>,
}

impl AgentUpdate {
    /// Every mutation stamps both modification fields.
    pub fn touched(now: DateTime<Utc>) -> Self {
        Self {
            updated_at: Some(now),
            last_modified: Some(now),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
