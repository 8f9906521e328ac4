pub mod config;
pub mod repository;

pub use config::*;
pub use repository::*;
