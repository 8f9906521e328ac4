use crate::application::AgentChange;
use crate::domain::{Agent, DisplayZone, UserType};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Serialize, ToSchema)]
pub(super) struct HealthResponse {
    pub(super) status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) error: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub(super) struct LookupParams {
    /// Any common format; normalized before the query.
    pub(super) phone: String,
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub(super) struct ChangePlanRequest {
    #[validate(length(min = 1))]
    #[schema(example = "8118823650")]
    pub(super) phone_number: String,
    #[schema(example = "premium")]
    pub(super) plan: String,
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub(super) struct AddCreditsRequest {
    #[validate(length(min = 1))]
    #[schema(example = "+918118823650")]
    pub(super) phone_number: String,
    /// The operator form caps a single top-up at 1000.
    #[validate(range(min = 1, max = 1000))]
    pub(super) amount: i64,
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub(super) struct BlacklistRequest {
    #[validate(length(min = 1))]
    pub(super) phone_number: String,
}

#[derive(Serialize, Debug, PartialEq, ToSchema)]
pub(super) struct PlanResponse {
    pub(super) name: String,
    pub(super) title: String,
    pub(super) credits: i64,
    pub(super) validity: String,
}

impl From<UserType> for PlanResponse {
    fn from(plan: UserType) -> Self {
        let spec = plan.spec();
        Self {
            name: plan.to_string(),
            title: plan.title().to_string(),
            credits: spec.monthly_credits,
            validity: spec.validity_label.to_string(),
        }
    }
}

#[derive(Serialize, Debug, PartialEq, ToSchema)]
pub(super) struct AgentSummary {
    pub(super) id: String,
    pub(super) name: String,
    pub(super) phone_number: String,
    pub(super) plan: String,
    pub(super) monthly_credits: i64,
    pub(super) plan_expiry: Option<String>,
    pub(super) trial_used: bool,
    pub(super) status: String,
}

impl AgentSummary {
    pub(super) fn new(agent: Agent, zone: DisplayZone) -> Self {
        Self {
            plan: agent.user_type.to_string().to_uppercase(),
            plan_expiry: agent.plan_expiry.map(|ts| zone.format_datetime(ts)),
            status: if agent.blacklisted { "BLACKLISTED" } else { "ACTIVE" }.to_string(),
            name: agent.name.unwrap_or_else(|| "Not Available".to_string()),
            id: agent.id,
            phone_number: agent.phone_number,
            monthly_credits: agent.monthly_credits,
            trial_used: agent.trial_used,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub(super) struct ChangeResponse {
    pub(super) agent_id: String,
    pub(super) message: String,
    /// Field name to written value; timestamps in epoch seconds.
    #[schema(value_type = Object)]
    pub(super) changes: serde_json::Value,
}

impl From<AgentChange> for ChangeResponse {
    fn from(change: AgentChange) -> Self {
        Self {
            changes: serde_json::to_value(&change.update).unwrap_or_default(),
            agent_id: change.agent_id,
            message: change.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn credits_request_enforces_form_bounds() {
        let ok = AddCreditsRequest {
            phone_number: "8118823650".into(),
            amount: 1000,
        };
        assert!(ok.validate().is_ok());

        for amount in [0, -3, 1001] {
            let bad = AddCreditsRequest {
                phone_number: "8118823650".into(),
                amount,
            };
            assert!(bad.validate().is_err(), "amount {} should be rejected", amount);
        }
    }

    #[test]
    fn summary_renders_plan_status_and_ist_expiry() {
        let mut agent = Agent::new("a1", "+918118823650");
        agent.user_type = UserType::Premium;
        agent.blacklisted = true;
        agent.plan_expiry = DateTime::from_timestamp(1_706_731_200, 0);

        let summary = AgentSummary::new(agent, DisplayZone::default());
        assert_eq!(summary.plan, "PREMIUM");
        assert_eq!(summary.status, "BLACKLISTED");
        assert_eq!(summary.name, "Not Available");
        assert_eq!(summary.plan_expiry.as_deref(), Some("2024-02-01 01:30"));
    }

    #[test]
    fn plan_catalog_entries() {
        let plans: Vec<PlanResponse> = UserType::catalog().into_iter().map(Into::into).collect();
        assert_eq!(plans[0].name, "premium");
        assert_eq!(plans[0].validity, "1 Year");
        assert_eq!(plans[2].credits, 5);
    }
}
