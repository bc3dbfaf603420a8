//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `NDA_APPROVAL_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use nda_approval::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod analysis;
mod error;
mod features;
mod registry;
mod server;
mod storage;
mod telegram;

pub use analysis::AnalysisConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use registry::RegistryConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;
pub use telegram::TelegramConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so the service starts with an empty
/// environment; missing collaborators are reported by
/// [`AppConfig::missing_collaborators`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Analysis webhook
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Telegram bot, approval chat and broadcast channel
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Raw upload storage and cleanup
    #[serde(default)]
    pub storage: StorageConfig,

    /// Callback correlation retention
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `NDA_APPROVAL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `NDA_APPROVAL__SERVER__PORT=3001` -> `server.port = 3001`
    /// - `NDA_APPROVAL__TELEGRAM__BOT_TOKEN=...` -> `telegram.bot_token = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("NDA_APPROVAL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for malformed values. Missing credentials
    /// are not errors.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.analysis.validate()?;
        self.telegram.validate()?;
        self.storage.validate()?;
        self.registry.validate()?;
        if self.features.register_webhook_on_startup
            && self
                .telegram
                .webhook_url
                .as_deref()
                .map_or(true, |u| u.trim().is_empty())
        {
            return Err(ValidationError::WebhookUrlRequired);
        }
        Ok(())
    }

    /// Names of collaborator settings that are not set.
    ///
    /// The service runs without them; calls that need them fail with
    /// `NotConfigured`.
    pub fn missing_collaborators(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.analysis.is_configured() {
            missing.push("analysis.webhook_url");
        }
        if !self.telegram.has_bot_token() {
            missing.push("telegram.bot_token");
        }
        if !self.telegram.has_chat_id() {
            missing.push("telegram.chat_id");
        }
        if !self.telegram.has_channel_id() {
            missing.push("telegram.channel_id");
        }
        missing
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Whether error responses carry technical details
    pub fn expose_error_details(&self) -> bool {
        !self.is_production() || self.features.verbose_errors
    }
}

/// True for absolute http(s) URLs with a host part.
pub(crate) fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    rest.is_some_and(|r| !r.is_empty() && !r.starts_with('/'))
}
