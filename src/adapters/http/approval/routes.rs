//! Axum router for the intake and approval endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    analyze_document, download_file, health, send_approval_request, telegram_diagnostics,
    telegram_webhook, ApprovalAppState,
};

/// Multipart framing on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the approval API router.
///
/// # Routes
/// - `POST /api/analyze-nda` - Upload, analyze and route a document
/// - `POST /api/send-approval-request` - Route an earlier verdict
/// - `POST /api/telegram-webhook` - Telegram updates (button presses)
/// - `GET /api/download/:filename` - Stored upload
/// - `GET /api/test-telegram` - Bot diagnostics
/// - `GET /health` - Liveness
pub fn approval_router(state: ApprovalAppState) -> Router {
    let upload_limit = state.max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES);

    let api = Router::new()
        .route(
            "/analyze-nda",
            post(analyze_document).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/send-approval-request", post(send_approval_request))
        .route("/telegram-webhook", post(telegram_webhook))
        .route("/download/:filename", get(download_file))
        .route("/test-telegram", get(telegram_diagnostics));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .with_state(state)
}
