//! Agent Plans
//!
//! Subscription plan, manual credit and blacklist management for agents,
//! looked up by phone number.
//!
//! The plan rules themselves are pure functions in [`application::plan_lifecycle`];
//! [`application::AgentAdminService`] wires them to an [`infrastructure::AgentRepository`].
//!
//! ## Standalone
//!
//! Run the binary:
//! ```bash
//! agent-plans-server
//! ```
//!
//! ## Embedded (Axum)
//!
//! When the `server` feature is enabled, this crate can be embedded into a larger Axum app:
//! ```rust,ignore
//! use axum::Router;
//! use agent_plans::infrastructure::AppConfig;
//! use agent_plans::server::{build_state_with_pool, router};
//! use sqlx::PgPool;
//!
//! let cfg = AppConfig::from_env()?;
//! let pool = PgPool::connect(&cfg.database_url).await?;
//! let state = build_state_with_pool(cfg, pool, true).await?;
//! let app = Router::new().nest("/admin", router(state));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

// Enabled behind the `server` feature so the core library can be used without Axum.
#[cfg(feature = "server")]
pub mod server;

pub use application::*;
pub use domain::*;
pub use infrastructure::*;

#[cfg(feature = "server")]
pub use server::*;
