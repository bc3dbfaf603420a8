//! Telegram bot configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::is_http_url;

/// Telegram Bot API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token from BotFather
    pub bot_token: Option<Secret<String>>,

    /// Chat receiving approval requests
    pub chat_id: Option<String>,

    /// Channel receiving decision broadcasts
    pub channel_id: Option<String>,

    /// Bot API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Public URL of `/api/telegram-webhook`, used for `setWebhook`
    pub webhook_url: Option<String>,

    /// Value expected in `X-Telegram-Bot-Api-Secret-Token`
    pub webhook_secret: Option<Secret<String>>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl TelegramConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_bot_token(&self) -> bool {
        self.bot_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().trim().is_empty())
    }

    pub fn has_chat_id(&self) -> bool {
        self.chat_id.as_ref().is_some_and(|c| !c.trim().is_empty())
    }

    pub fn has_channel_id(&self) -> bool {
        self.channel_id.as_ref().is_some_and(|c| !c.trim().is_empty())
    }

    /// Webhook secret, if one is configured and non-empty
    pub fn webhook_secret(&self) -> Option<&Secret<String>> {
        self.webhook_secret
            .as_ref()
            .filter(|s| !s.expose_secret().is_empty())
    }

    /// Validate Telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout("telegram"));
        }
        if !is_http_url(&self.api_base_url) {
            return Err(ValidationError::InvalidUrl("telegram.api_base_url"));
        }
        if let Some(url) = self.webhook_url.as_deref().filter(|u| !u.trim().is_empty()) {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidUrl("telegram.webhook_url"));
            }
        }
        Ok(())
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            channel_id: None,
            api_base_url: default_api_base_url(),
            webhook_url: None,
            webhook_secret: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_timeout() -> u64 {
    15
}
