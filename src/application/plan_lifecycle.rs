//! Plan transitions as pure computations.
//!
//! Each function takes the agent as last read from the store plus the
//! caller's clock reading and returns the [`AgentUpdate`] to persist. Nothing
//! here performs I/O or reads the clock.

use crate::domain::{Agent, AgentUpdate, UserType};
use crate::infrastructure::RepositoryError;
use chrono::{DateTime, Duration, Utc};
use std::str::FromStr;
use thiserror::Error;

/// Renewal is re-evaluated this long after any plan change, whatever the tier.
pub const RENEWAL_INTERVAL_DAYS: i64 = 30;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid plan selected: {0}")]
    InvalidPlan(String),
    #[error("Invalid credit amount: {0} (must be a positive integer)")]
    InvalidAmount(i64),
    #[error("Persistence failure: {0}")]
    Persistence(#[from] RepositoryError),
}

impl UserType {
    /// Parse an operator-supplied plan name. Exact, lowercase match only.
    pub fn parse_plan(name: &str) -> Result<Self, PlanError> {
        UserType::from_str(name).map_err(|_| PlanError::InvalidPlan(name.to_string()))
    }
}

pub fn apply_plan_change(agent: &Agent, target: UserType, now: DateTime<Utc>) -> AgentUpdate {
    let plan = target.spec();

    let mut update = AgentUpdate {
        next_renewal: Some(now + Duration::days(RENEWAL_INTERVAL_DAYS)),
        user_type: Some(target),
        plan_expiry: Some(now + Duration::days(plan.expiry_days)),
        monthly_credits: Some(plan.monthly_credits),
        ..AgentUpdate::touched(now)
    };

    // Decided by the state before this change. Re-entering trial is not
    // guarded by trial_used.
    if agent.user_type == UserType::Basic && target != UserType::Basic {
        update.trial_used = Some(true);
        update.trial_started_at = Some(now);
    }

    update
}

/// Manual top-up; adds to the current balance instead of replacing it.
pub fn add_credits(agent: &Agent, amount: i64, now: DateTime<Utc>) -> Result<AgentUpdate, PlanError> {
    if amount <= 0 {
        return Err(PlanError::InvalidAmount(amount));
    }

    let total = agent
        .monthly_credits
        .checked_add(amount)
        .ok_or(PlanError::InvalidAmount(amount))?;

    Ok(AgentUpdate {
        monthly_credits: Some(total),
        ..AgentUpdate::touched(now)
    })
}

/// Blacklisting is orthogonal to plan state.
pub fn toggle_blacklist(agent: &Agent, now: DateTime<Utc>) -> AgentUpdate {
    AgentUpdate {
        blacklisted: Some(!agent.blacklisted),
        ..AgentUpdate::touched(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn agent(user_type: UserType) -> Agent {
        Agent {
            user_type,
            ..Agent::new("agent-1", "+918118823650")
        }
    }

    #[test]
    fn premium_runs_a_year_with_100_credits() {
        let update = apply_plan_change(&agent(UserType::Trial), UserType::Premium, t0());
        assert_eq!(update.plan_expiry, Some(t0() + Duration::days(365)));
        assert_eq!(update.monthly_credits, Some(100));
        assert_eq!(update.next_renewal, Some(t0() + Duration::days(30)));
        assert_eq!(update.user_type, Some(UserType::Premium));
    }

    #[test]
    fn trial_runs_thirty_days_with_100_credits() {
        let update = apply_plan_change(&agent(UserType::Premium), UserType::Trial, t0());
        assert_eq!(update.plan_expiry, Some(t0() + Duration::days(30)));
        assert_eq!(update.monthly_credits, Some(100));
    }

    #[test]
    fn basic_gets_five_credits() {
        let update = apply_plan_change(&agent(UserType::Premium), UserType::Basic, t0());
        assert_eq!(update.monthly_credits, Some(5));
        assert_eq!(update.plan_expiry, Some(t0() + Duration::days(30)));
    }

    #[test]
    fn plan_expiry_is_offset_from_last_modified() {
        for target in UserType::catalog() {
            let update = apply_plan_change(&agent(UserType::Basic), target, t0());
            let modified = update.last_modified.unwrap();
            assert_eq!(update.updated_at, Some(modified));
            assert_eq!(
                update.plan_expiry,
                Some(modified + Duration::days(target.spec().expiry_days))
            );
        }
    }

    #[test]
    fn leaving_basic_marks_trial_used() {
        let update = apply_plan_change(&agent(UserType::Basic), UserType::Premium, t0());
        assert_eq!(update.trial_used, Some(true));
        assert_eq!(update.trial_started_at, Some(t0()));
    }

    #[test]
    fn leaving_premium_for_basic_does_not_touch_trial_fields() {
        let update = apply_plan_change(&agent(UserType::Premium), UserType::Basic, t0());
        assert_eq!(update.trial_used, None);
        assert_eq!(update.trial_started_at, None);
    }

    #[test]
    fn basic_to_basic_does_not_touch_trial_fields() {
        let update = apply_plan_change(&agent(UserType::Basic), UserType::Basic, t0());
        assert_eq!(update.trial_used, None);
    }

    #[test]
    fn second_trial_is_not_blocked() {
        let mut used = agent(UserType::Basic);
        used.trial_used = true;
        let update = apply_plan_change(&used, UserType::Trial, t0());
        assert_eq!(update.user_type, Some(UserType::Trial));
        assert_eq!(update.trial_used, Some(true));
    }

    #[test]
    fn unknown_plan_names_are_rejected() {
        assert!(matches!(
            UserType::parse_plan("gold"),
            Err(PlanError::InvalidPlan(name)) if name == "gold"
        ));
        assert!(UserType::parse_plan("").is_err());
        assert_eq!(UserType::parse_plan("basic").unwrap(), UserType::Basic);
    }

    #[test]
    fn credits_are_additive() {
        let mut a = agent(UserType::Trial);
        a.monthly_credits = 10;
        let update = add_credits(&a, 5, t0()).unwrap();
        assert_eq!(update.monthly_credits, Some(15));
        assert_eq!(update.last_modified, Some(t0()));
        assert_eq!(update.user_type, None);
    }

    #[test]
    fn non_positive_credit_amounts_are_rejected() {
        let a = agent(UserType::Trial);
        assert!(matches!(add_credits(&a, 0, t0()), Err(PlanError::InvalidAmount(0))));
        assert!(matches!(add_credits(&a, -3, t0()), Err(PlanError::InvalidAmount(-3))));
    }

    #[test]
    fn credit_overflow_is_rejected() {
        let mut a = agent(UserType::Trial);
        a.monthly_credits = i64::MAX;
        assert!(matches!(add_credits(&a, 1, t0()), Err(PlanError::InvalidAmount(1))));
    }

    #[test]
    fn blacklist_toggles_back_and_forth() {
        let a = agent(UserType::Basic);
        let first = toggle_blacklist(&a, t0());
        assert_eq!(first.blacklisted, Some(true));

        let flipped = a.with_update(&first);
        let second = toggle_blacklist(&flipped, t0());
        assert_eq!(second.blacklisted, Some(false));
        assert_eq!(second.user_type, None);
        assert_eq!(second.monthly_credits, None);
    }

    #[test]
    fn basic_agent_starting_a_trial() {
        let mut a = agent(UserType::Basic);
        a.monthly_credits = 5;

        let after = a.with_update(&apply_plan_change(&a, UserType::Trial, t0()));

        assert_eq!(after.user_type, UserType::Trial);
        assert_eq!(after.monthly_credits, 100);
        assert_eq!(after.plan_expiry, Some(t0() + Duration::days(30)));
        assert_eq!(after.next_renewal, Some(t0() + Duration::days(30)));
        assert!(after.trial_used);
        assert_eq!(after.trial_started_at, Some(t0()));
    }
}
