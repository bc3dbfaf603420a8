//! Webhook analysis client - posts extracted text to the analysis workflow.
//!
//! # Configuration
//!
//! ```ignore
//! let config = WebhookAnalysisConfig::new(Some("https://n8n.example.com/webhook/nda".into()))
//!     .with_timeout(Duration::from_secs(90));
//! let service = WebhookAnalysisService::new(config);
//! ```
//!
//! The workflow answers with a verdict object or an array whose first
//! element is the verdict. Anything else becomes the manual review default.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::verdict::AnalysisVerdict;
use crate::ports::{AnalysisError, AnalysisRequest, AnalysisService};

/// Longest slice of an upstream error body carried into the error.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Configuration for the webhook client.
#[derive(Debug, Clone)]
pub struct WebhookAnalysisConfig {
    /// Webhook endpoint. `None` leaves the service unconfigured.
    pub webhook_url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl WebhookAnalysisConfig {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
            timeout: Duration::from_secs(90),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `AnalysisService` backed by an HTTP webhook.
pub struct WebhookAnalysisService {
    config: WebhookAnalysisConfig,
    client: Client,
}

impl WebhookAnalysisService {
    pub fn new(config: WebhookAnalysisConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    pub fn is_configured(&self) -> bool {
        self.config.webhook_url.is_some()
    }

    fn map_transport(&self, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            AnalysisError::Timeout {
                secs: self.config.timeout.as_secs(),
            }
        } else if err.is_connect() {
            AnalysisError::Transport(format!("Connection failed: {}", err))
        } else {
            AnalysisError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl AnalysisService for WebhookAnalysisService {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisVerdict, AnalysisError> {
        let url = self
            .config
            .webhook_url
            .as_deref()
            .ok_or(AnalysisError::NotConfigured)?;

        tracing::info!(
            filename = %request.filename,
            chars = request.extracted_text.chars().count(),
            "Sending document to analysis"
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(e))?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Analysis service returned an error");
            return Err(AnalysisError::Upstream {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        match AnalysisVerdict::parse_response_body(&body) {
            Ok(verdict) => {
                tracing::info!(
                    status = %verdict.status,
                    document_type = verdict.document_type.as_deref().unwrap_or("-"),
                    "Analysis verdict received"
                );
                Ok(verdict)
            }
            Err(reason) => {
                tracing::warn!(
                    reason = %reason,
                    "Unusable analysis response, falling back to manual review"
                );
                Ok(AnalysisVerdict::manual_review_default())
            }
        }
    }
}
