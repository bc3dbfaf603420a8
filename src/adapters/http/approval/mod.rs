//! HTTP adapter for document intake and approval.
//!
//! - `POST /api/analyze-nda` - Upload, analyze and route a document
//! - `POST /api/send-approval-request` - Route an earlier verdict
//! - `POST /api/telegram-webhook` - Telegram updates
//! - `GET /api/download/:filename` - Stored upload
//! - `GET /api/test-telegram` - Bot diagnostics
//! - `GET /health` - Liveness

pub mod dto;
pub mod handlers;
pub mod routes;

#[cfg(test)]
mod tests;

pub use handlers::{ApprovalAppState, SECRET_TOKEN_HEADER};
pub use routes::approval_router;
