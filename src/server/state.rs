use crate::application::AgentAdminService;
use crate::infrastructure::{AppConfig, PostgresAgentRepository};
use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;

pub type AgentAdminServiceType = AgentAdminService<PostgresAgentRepository>;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub admin: Arc<AgentAdminServiceType>,
    pub admin_token: Arc<str>,
}

/// Build full state from config + an existing pool.
///
/// Intended for embedding into a larger service that already manages a `PgPool`.
pub async fn build_state_with_pool(
    config: AppConfig,
    pool: PgPool,
    run_migrations: bool,
) -> anyhow::Result<AppState> {
    if run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run migrations")?;
    }

    let display_zone = config.display_zone().context("display zone")?;
    let agent_repo = Arc::new(PostgresAgentRepository::new(pool.clone()));
    let admin = Arc::new(AgentAdminService::new(agent_repo, display_zone));

    Ok(AppState {
        pool,
        admin,
        admin_token: Arc::from(config.admin_token.as_str()),
    })
}

/// Build state for the standalone server.
///
/// Creates the `PgPool`, runs migrations, and wires the repository/service.
pub async fn build_state_from_env(config: AppConfig) -> anyhow::Result<AppState> {
    let pool = PgPool::connect(&config.database_url)
        .await
        .context("connect database")?;
    build_state_with_pool(config, pool, true).await
}
