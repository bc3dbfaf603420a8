//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeatureFlags {
    /// Include technical details in error responses outside development
    #[serde(default)]
    pub verbose_errors: bool,

    /// Call `setWebhook` at startup with `telegram.webhook_url`
    #[serde(default)]
    pub register_webhook_on_startup: bool,
}
