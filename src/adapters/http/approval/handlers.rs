//! HTTP handlers for document intake, approval routing and the Telegram
//! webhook.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

use crate::adapters::http::error::ApiError;
use crate::adapters::telegram::{CallbackQuery, Update};
use crate::application::{
    CallbackMessage, DecisionCallbackCommand, DecisionCallbackHandler, IntakeDocumentCommand,
    IntakeDocumentHandler, RouteVerdictCommand, RouteVerdictHandler,
};
use crate::domain::approval::MessageRef;
use crate::domain::document::{DocumentFormat, UploadedDocument};
use crate::domain::foundation::ErrorCode;
use crate::domain::verdict::AnalysisVerdict;
use crate::ports::{ArtifactStorage, ChatMessenger};

use super::dto::{
    AnalyzeResponse, ApprovalOutcome, HealthResponse, SendApprovalRequest, SendApprovalResponse,
    TelegramDiagnosticsResponse, WebhookAck,
};

/// Header Telegram sets on webhook calls when a secret was registered.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the approval endpoints.
#[derive(Clone)]
pub struct ApprovalAppState {
    pub intake: Arc<IntakeDocumentHandler>,
    pub router: Arc<RouteVerdictHandler>,
    pub callbacks: Arc<DecisionCallbackHandler>,
    pub storage: Arc<dyn ArtifactStorage>,
    pub messenger: Arc<dyn ChatMessenger>,
    /// When set, webhook calls must carry this value in `SECRET_TOKEN_HEADER`.
    pub webhook_secret: Option<Secret<String>>,
    /// Include internal error detail in error bodies.
    pub expose_error_details: bool,
    pub max_upload_bytes: usize,
}

impl ApprovalAppState {
    fn fail(&self, err: impl Into<ApiError>) -> ApiError {
        err.into().redact(self.expose_error_details)
    }

    fn secret_matches(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.webhook_secret else {
            return true;
        };
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        provided.ct_eq(expected.expose_secret().as_bytes()).into()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Intake
// ════════════════════════════════════════════════════════════════════════════════

/// Fields collected from the upload form.
#[derive(Default)]
struct IntakeForm {
    file: Option<UploadedDocument>,
    responsible: Option<String>,
    company_name: Option<String>,
    comment: Option<String>,
}

/// `POST /api/analyze-nda`
pub async fn analyze_document(
    State(state): State<ApprovalAppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_intake_form(multipart, state.max_upload_bytes)
        .await
        .map_err(|e| e.redact(state.expose_error_details))?;

    let Some(document) = form.file else {
        return Err(ApiError::validation("Файл не загружен"));
    };

    let cmd = IntakeDocumentCommand {
        document,
        responsible: form.responsible.unwrap_or_default(),
        company_name: form.company_name.unwrap_or_default(),
        comment: form.comment,
    };

    let result = state.intake.handle(cmd).await.map_err(|e| {
        tracing::warn!(error = %e, "Document intake failed");
        state.fail(e)
    })?;

    Ok(Json(AnalyzeResponse::from(&result)))
}

async fn read_intake_form(mut multipart: Multipart, max_bytes: usize) -> Result<IntakeForm, ApiError> {
    let mut form = IntakeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("document").to_string();
                let mime_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.len() > max_bytes {
                    return Err(too_large(max_bytes));
                }
                form.file = Some(UploadedDocument::new(bytes.to_vec(), filename, mime_type));
            }
            "responsible" | "inn" => {
                let value = field.text().await.map_err(multipart_error)?;
                // The current field name wins over the legacy alias.
                if name == "responsible" || form.responsible.is_none() {
                    form.responsible = Some(value);
                }
            }
            "companyName" => form.company_name = Some(field.text().await.map_err(multipart_error)?),
            "comment" => {
                let value = field.text().await.map_err(multipart_error)?;
                form.comment = Some(value).filter(|c| !c.trim().is_empty());
            }
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::new(ErrorCode::PayloadTooLarge, "Файл слишком большой")
            .with_details(err.body_text());
    }
    ApiError::validation("Некорректная форма загрузки").with_details(err.body_text())
}

fn too_large(max_bytes: usize) -> ApiError {
    ApiError::new(ErrorCode::PayloadTooLarge, "Файл слишком большой")
        .with_details(format!("limit is {} bytes", max_bytes))
}

/// `POST /api/send-approval-request`
pub async fn send_approval_request(
    State(state): State<ApprovalAppState>,
    Json(req): Json<SendApprovalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let analysis = serde_json::from_value::<AnalysisVerdict>(req.analysis).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Malformed verdict in approval request, using manual review");
        AnalysisVerdict::manual_review_default()
    });

    let cmd = RouteVerdictCommand {
        company_name: req.company_name,
        responsible: req.responsible,
        filename: req.filename,
        analysis,
        comment: req.comment.filter(|c| !c.trim().is_empty()),
        download_url: req.download_url,
    };

    let outcome = state.router.handle(cmd).await.map_err(|e| state.fail(e))?;

    Ok(Json(SendApprovalResponse {
        success: true,
        approval: ApprovalOutcome::from(&outcome),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Telegram
// ════════════════════════════════════════════════════════════════════════════════

/// `POST /api/telegram-webhook`
///
/// Answers `{"ok":true}` for every update so Telegram never retries, including
/// updates that fail to parse. Only a wrong secret token is refused.
pub async fn telegram_webhook(
    State(state): State<ApprovalAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.secret_matches(&headers) {
        tracing::warn!("Webhook call with a wrong secret token");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match serde_json::from_slice::<Update>(&body) {
        Ok(update) => {
            if let Some(query) = update.callback_query {
                let outcome = state.callbacks.handle(callback_command(query)).await;
                tracing::debug!(update_id = update.update_id, outcome = ?outcome, "Callback handled");
            } else if update.message.is_some() {
                tracing::debug!(update_id = update.update_id, "Ignoring chat message update");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Unparseable webhook update"),
    }

    Json(WebhookAck::ok()).into_response()
}

fn callback_command(query: CallbackQuery) -> DecisionCallbackCommand {
    DecisionCallbackCommand {
        actor: query.from.display_name(),
        message: query.message.map(|m| CallbackMessage {
            message_ref: MessageRef {
                chat_id: m.chat.id,
                message_id: m.message_id,
            },
            text: m.text,
        }),
        callback_id: query.id,
        data: query.data,
    }
}

/// `GET /api/test-telegram`
pub async fn telegram_diagnostics(
    State(state): State<ApprovalAppState>,
) -> Result<impl IntoResponse, ApiError> {
    let diagnostics = state.messenger.diagnostics().await.map_err(|e| {
        tracing::warn!(error = %e, "Bot diagnostics failed");
        state.fail(e)
    })?;

    Ok(Json(TelegramDiagnosticsResponse {
        success: true,
        diagnostics,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Downloads
// ════════════════════════════════════════════════════════════════════════════════

/// `GET /api/download/:filename`
pub async fn download_file(
    State(state): State<ApprovalAppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.storage.open(&filename).await.map_err(|e| {
        tracing::debug!(error = %e, filename = %filename, "Download refused");
        state.fail(e)
    })?;

    let content_type = DocumentFormat::detect(None, Some(filename.as_str()))
        .map(|f| f.canonical_mime())
        .unwrap_or("application/octet-stream");
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}
