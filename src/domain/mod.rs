pub mod agent;
pub mod display;
pub mod phone;

pub use agent::*;
pub use display::*;
pub use phone::*;
