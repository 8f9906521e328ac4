use crate::domain::{DisplayZone, IST_OFFSET_MINUTES};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Bearer token required by the mutating routes. Empty disables them.
    pub admin_token: String,
    /// Operator-facing zone for rendered dates, minutes east of UTC.
    pub display_utc_offset_minutes: i32,
    /// `pretty` or `json`.
    pub log_format: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("PLANS").try_parsing(true))
            .set_default("server_host", "0.0.0.0")?
            .set_default("server_port", 8080)?
            .set_default("admin_token", "")?
            .set_default("display_utc_offset_minutes", IST_OFFSET_MINUTES)?
            .set_default("log_format", "pretty")
    }

    pub fn display_zone(&self) -> Result<DisplayZone, ConfigError> {
        DisplayZone::from_offset_minutes(self.display_utc_offset_minutes).ok_or_else(|| {
            ConfigError::Message(format!(
                "display_utc_offset_minutes out of range: {}",
                self.display_utc_offset_minutes
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/agents".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            admin_token: String::new(),
            display_utc_offset_minutes: IST_OFFSET_MINUTES,
            log_format: "pretty".to_string(),
        }
    }

    #[test]
    fn defaults_fill_everything_but_the_database() {
        let cfg: AppConfig = AppConfig::builder()
            .unwrap()
            .set_override("database_url", "postgres://localhost/agents")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.server_port, 8080);
        assert_eq!(cfg.display_utc_offset_minutes, 330);
        assert!(cfg.admin_token.is_empty());
        assert_eq!(cfg.log_format, "pretty");
    }

    #[test]
    fn display_zone_rejects_bad_offsets() {
        assert_eq!(sample().display_zone().unwrap(), DisplayZone::default());

        let bad = AppConfig {
            display_utc_offset_minutes: 5000,
            ..sample()
        };
        assert!(bad.display_zone().is_err());
    }
}
