//! API configuration

use core_kernel::Currency;
use serde::Deserialize;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// `json` for JSON log lines, anything else for text
    pub log_format: String,
    /// Currency used to read and format amounts
    pub currency: Currency,
    /// Day of the month quotas fall due when a request names none
    pub default_due_day: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            currency: Currency::EUR,
            default_due_day: 8,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables over the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let config: Self = config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", defaults.log_format)?
            .set_default("currency", defaults.currency.code())?
            .set_default("default_due_day", i64::from(defaults.default_due_day))?
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the type system cannot
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if !(1..=31).contains(&self.default_due_day) {
            return Err(config::ConfigError::Message(format!(
                "default_due_day must be between 1 and 31, got {}",
                self.default_due_day
            )));
        }
        Ok(())
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
