//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid {0} timeout")]
    InvalidTimeout(&'static str),

    #[error("{0} must be an http(s) URL")]
    InvalidUrl(&'static str),

    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),

    #[error("Webhook registration requires telegram.webhook_url")]
    WebhookUrlRequired,
}
