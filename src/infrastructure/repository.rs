use crate::domain::{Agent, AgentUpdate, UserType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Exact, case-sensitive match on the stored phone field. Returns the
    /// first match when several records share a number.
    async fn get_by_phone_number(&self, phone_number: &str) -> Result<Agent, RepositoryError>;

    /// Writes only the fields set in `update`, in one statement.
    async fn apply_update(&self, id: &str, update: &AgentUpdate) -> Result<(), RepositoryError>;
}

pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    async fn get_by_phone_number(&self, phone_number: &str) -> Result<Agent, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone_number, user_type, plan_expiry, next_renewal,
                   monthly_credits, trial_used, trial_started_at, blacklisted,
                   updated_at, last_modified
            FROM agents
            WHERE phone_number = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("Agent with phone {}", phone_number)))?;

        row_to_agent(&row)
    }

    async fn apply_update(&self, id: &str, update: &AgentUpdate) -> Result<(), RepositoryError> {
        if update.is_empty() {
            return Ok(());
        }

        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE agents SET ");
        {
            let mut fields = query.separated(", ");

            if let Some(user_type) = update.user_type {
                fields.push("user_type = ");
                fields.push_bind_unseparated(user_type.to_string());
            }
            if let Some(ts) = update.plan_expiry {
                fields.push("plan_expiry = ");
                fields.push_bind_unseparated(ts.timestamp());
            }
            if let Some(ts) = update.next_renewal {
                fields.push("next_renewal = ");
                fields.push_bind_unseparated(ts.timestamp());
            }
            if let Some(credits) = update.monthly_credits {
                fields.push("monthly_credits = ");
                fields.push_bind_unseparated(credits);
            }
            if let Some(used) = update.trial_used {
                fields.push("trial_used = ");
                fields.push_bind_unseparated(used);
            }
            if let Some(ts) = update.trial_started_at {
                fields.push("trial_started_at = ");
                fields.push_bind_unseparated(ts.timestamp());
            }
            if let Some(blacklisted) = update.blacklisted {
                fields.push("blacklisted = ");
                fields.push_bind_unseparated(blacklisted);
            }
            if let Some(ts) = update.updated_at {
                fields.push("updated_at = ");
                fields.push_bind_unseparated(ts.timestamp());
            }
            if let Some(ts) = update.last_modified {
                fields.push("last_modified = ");
                fields.push_bind_unseparated(ts.timestamp());
            }
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Agent {}", id)));
        }

        Ok(())
    }
}

fn epoch_to_utc(column: &str, secs: Option<i64>) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    secs.map(|s| {
        DateTime::from_timestamp(s, 0).ok_or_else(|| {
            RepositoryError::InvalidData(format!("{} out of range: {}", column, s))
        })
    })
    .transpose()
}

fn row_to_agent(row: &sqlx::postgres::PgRow) -> Result<Agent, RepositoryError> {
    let user_type_str: String = row.try_get("user_type")?;

    Ok(Agent {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        phone_number: row.try_get("phone_number")?,
        user_type: UserType::from_str(&user_type_str).map_err(|_| {
            RepositoryError::InvalidData(format!("Unknown user type: {}", user_type_str))
        })?,
        plan_expiry: epoch_to_utc("plan_expiry", row.try_get("plan_expiry")?)?,
        next_renewal: epoch_to_utc("next_renewal", row.try_get("next_renewal")?)?,
        monthly_credits: row.try_get("monthly_credits")?,
        trial_used: row.try_get("trial_used")?,
        trial_started_at: epoch_to_utc("trial_started_at", row.try_get("trial_started_at")?)?,
        blacklisted: row.try_get("blacklisted")?,
        updated_at: epoch_to_utc("updated_at", row.try_get("updated_at")?)?,
        last_modified: epoch_to_utc("last_modified", row.try_get("last_modified")?)?,
    })
}
