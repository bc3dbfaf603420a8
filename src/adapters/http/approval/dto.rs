//! Request and response DTOs for the intake and approval endpoints.
//!
//! Field names are camelCase to match the existing web form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{ExtractionSummary, IntakeResult, RoutingOutcome};
use crate::domain::approval::{Application, ApprovalStatus, Routing, AI_ACTOR};
use crate::domain::document::DocumentCategory;
use crate::domain::foundation::Timestamp;
use crate::domain::verdict::AnalysisVerdict;
use crate::ports::{BotDiagnostics, StoredArtifact};

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/send-approval-request`.
///
/// `analysis` stays raw so a malformed verdict can be replaced by the
/// manual-review default instead of rejecting the request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendApprovalRequest {
    #[serde(default, alias = "inn")]
    pub responsible: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub analysis: Value,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// Where the verdict was routed, flattened for the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalOutcome {
    pub routing: Routing,
    pub category: DocumentCategory,
    pub status: ApprovalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast_delivered: Option<bool>,
}

impl From<&RoutingOutcome> for ApprovalOutcome {
    fn from(outcome: &RoutingOutcome) -> Self {
        match outcome {
            RoutingOutcome::AutoApproved {
                category,
                decided_at,
                broadcast_delivered,
            } => Self {
                routing: Routing::AutoApprove,
                category: *category,
                status: ApprovalStatus::Approved,
                token: None,
                short_id: None,
                decided_by: Some(AI_ACTOR.to_string()),
                decided_at: Some(*decided_at),
                broadcast_delivered: Some(*broadcast_delivered),
            },
            RoutingOutcome::ApprovalRequested {
                category,
                application,
            } => Self::pending(*category, application),
        }
    }
}

impl ApprovalOutcome {
    fn pending(category: DocumentCategory, application: &Application) -> Self {
        Self {
            routing: Routing::ManualApproval,
            category,
            status: application.status(),
            token: Some(application.token().to_string()),
            short_id: Some(application.short_id().to_string()),
            decided_by: application.decided_by().map(str::to_string),
            decided_at: application.decided_at(),
            broadcast_delivered: None,
        }
    }
}

/// Stored upload reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFileResponse {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    pub checksum: String,
    pub size: u64,
}

impl From<&StoredArtifact> for StoredFileResponse {
    fn from(artifact: &StoredArtifact) -> Self {
        Self {
            key: artifact.key.clone(),
            download_url: artifact.download_url.clone(),
            checksum: artifact.checksum.clone(),
            size: artifact.size,
        }
    }
}

/// Body of a successful `POST /api/analyze-nda`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: AnalysisVerdict,
    pub document_category: DocumentCategory,
    pub extraction: ExtractionSummary,
    pub approval: ApprovalOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<StoredFileResponse>,
}

impl From<&IntakeResult> for AnalyzeResponse {
    fn from(result: &IntakeResult) -> Self {
        Self {
            success: true,
            analysis: result.verdict.clone(),
            document_category: result.category,
            extraction: result.extraction.clone(),
            approval: ApprovalOutcome::from(&result.routing),
            file: result.stored.as_ref().map(StoredFileResponse::from),
        }
    }
}

/// Body of a successful `POST /api/send-approval-request`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendApprovalResponse {
    pub success: bool,
    pub approval: ApprovalOutcome,
}

/// Body of `GET /api/test-telegram`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramDiagnosticsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub diagnostics: BotDiagnostics,
}

/// Reply to every accepted Telegram update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookAck {
    pub ok: bool,
}

impl WebhookAck {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
