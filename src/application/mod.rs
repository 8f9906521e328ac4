pub mod agent_admin;
pub mod plan_lifecycle;

pub use agent_admin::*;
pub use plan_lifecycle::*;
