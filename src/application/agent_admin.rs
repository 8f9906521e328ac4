use super::plan_lifecycle::{self, PlanError};
use crate::domain::{normalize_phone_number, Agent, AgentUpdate, DisplayZone, UserType};
use crate::infrastructure::{AgentRepository, RepositoryError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of one operator action: what was written and what to tell them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentChange {
    pub agent_id: String,
    pub update: AgentUpdate,
    pub message: String,
}

/// Operator-facing plan, credit and blacklist actions keyed by phone number.
///
/// Every action is one lookup followed by one partial write. There is no
/// concurrency token, so overlapping actions on one agent are last write
/// wins per field.
pub struct AgentAdminService<R>
where
    R: AgentRepository,
{
    agent_repo: Arc<R>,
    display_zone: DisplayZone,
}

impl<R> AgentAdminService<R>
where
    R: AgentRepository,
{
    pub fn new(agent_repo: Arc<R>, display_zone: DisplayZone) -> Self {
        Self {
            agent_repo,
            display_zone,
        }
    }

    pub fn display_zone(&self) -> DisplayZone {
        self.display_zone
    }

    pub async fn lookup_agent_by_phone(&self, phone: &str) -> Result<Agent, PlanError> {
        let phone_number = normalize_phone_number(phone);

        match self.agent_repo.get_by_phone_number(&phone_number).await {
            Ok(agent) => Ok(agent),
            Err(RepositoryError::NotFound(_)) => {
                warn!(phone = %phone_number, "No agent for phone number");
                Err(PlanError::NotFound(format!(
                    "No agent found with phone number {}",
                    phone_number
                )))
            }
            Err(e) => {
                error!(phone = %phone_number, error = %e, "Agent lookup failed");
                Err(e.into())
            }
        }
    }

    pub async fn change_plan(
        &self,
        phone: &str,
        plan: &str,
        now: DateTime<Utc>,
    ) -> Result<AgentChange, PlanError> {
        let target = UserType::parse_plan(plan)?;
        let agent = self.lookup_agent_by_phone(phone).await?;

        let update = plan_lifecycle::apply_plan_change(&agent, target, now);
        self.persist(&agent, &update).await?;

        let spec = target.spec();
        let expiry = update.plan_expiry.unwrap_or(now);
        info!(
            agent_id = %agent.id,
            from = %agent.user_type,
            to = %target,
            trial_started = update.trial_used.is_some(),
            "Updated agent plan"
        );

        Ok(AgentChange {
            message: format!(
                "Successfully updated plan to {}. New expiry: {}, Credits: {}",
                target.to_string().to_uppercase(),
                self.display_zone.format_date(expiry),
                spec.monthly_credits
            ),
            agent_id: agent.id,
            update,
        })
    }

    pub async fn add_credits(
        &self,
        phone: &str,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<AgentChange, PlanError> {
        let agent = self.lookup_agent_by_phone(phone).await?;

        let update = plan_lifecycle::add_credits(&agent, amount, now)?;
        self.persist(&agent, &update).await?;

        let total = update.monthly_credits.unwrap_or(agent.monthly_credits);
        info!(agent_id = %agent.id, amount, total, "Added manual credits");

        Ok(AgentChange {
            message: format!("Successfully added {} credits. New total: {}", amount, total),
            agent_id: agent.id,
            update,
        })
    }

    pub async fn toggle_blacklist(
        &self,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<AgentChange, PlanError> {
        let agent = self.lookup_agent_by_phone(phone).await?;

        let update = plan_lifecycle::toggle_blacklist(&agent, now);
        self.persist(&agent, &update).await?;

        let blacklisted = update.blacklisted.unwrap_or(agent.blacklisted);
        let status = if blacklisted { "blacklisted" } else { "unblacklisted" };
        info!(agent_id = %agent.id, blacklisted, "Toggled blacklist");

        Ok(AgentChange {
            message: format!("Successfully {} the agent", status),
            agent_id: agent.id,
            update,
        })
    }

    async fn persist(&self, agent: &Agent, update: &AgentUpdate) -> Result<(), PlanError> {
        self.agent_repo
            .apply_update(&agent.id, update)
            .await
            .map_err(|e| {
                error!(agent_id = %agent.id, error = %e, "Failed to write agent update");
                PlanError::Persistence(e)
            })
    }
}
