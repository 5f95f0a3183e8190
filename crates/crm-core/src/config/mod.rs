//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so that a missing
//! or empty file still yields a usable configuration.

pub mod api;
pub mod auth;
pub mod browser;
pub mod logging;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::api::ApiConfig;
use self::auth::AuthConfig;
use self::browser::BrowserConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`CRM__API__BASE_URL`).
pub const ENV_PREFIX: &str = "CRM";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Credential sources.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Browser defaults.
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `path` with an environment-specific overlay
    /// (`config/<env>.toml`) and environment variables prefixed with
    /// `CRM__`. Missing files are not an error.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check every section's constraints.
    pub fn validate(&self) -> Result<(), AppError> {
        self.api.validate()?;
        self.auth.validate()?;
        self.browser.validate()?;
        self.logging.validate()?;

        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(AppError::configuration(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }

        Ok(())
    }

    /// A copy safe to print: inline credentials are masked.
    pub fn redacted(&self) -> Self {
        Self {
            auth: self.auth.redacted(),
            ..self.clone()
        }
    }
}
