//! Chat Messenger Port - the chat-bot collaborator.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::approval::MessageRef;
use crate::domain::foundation::ErrorCode;
use crate::domain::notification::ComposedMessage;

/// Where a new message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatTarget {
    /// Chat where approvers press the decision buttons.
    ApprovalChat,
    /// Channel that receives every decision.
    BroadcastChannel,
}

/// Bot health information for the diagnostics endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotDiagnostics {
    pub bot: serde_json::Value,
    pub webhook: serde_json::Value,
    pub chat_id: Option<String>,
    pub channel_id: Option<String>,
}

/// Port for sending, editing and acknowledging chat messages.
///
/// All text is MarkdownV2 as produced by the notification composer.
#[async_trait]
pub trait ChatMessenger: Send + Sync {
    /// Fails with `NotConfigured` when messages to `target` cannot be sent.
    ///
    /// Checked before any state is created for a message.
    fn ensure_configured(&self, _target: ChatTarget) -> Result<(), MessengerError> {
        Ok(())
    }

    /// Sends a message and returns where it landed.
    async fn send_message(
        &self,
        target: ChatTarget,
        message: &ComposedMessage,
    ) -> Result<MessageRef, MessengerError>;

    /// Replaces the text (and keyboard) of an earlier message.
    async fn edit_message(
        &self,
        message_ref: MessageRef,
        message: &ComposedMessage,
    ) -> Result<(), MessengerError>;

    /// Shows a transient toast for a button press.
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), MessengerError>;

    async fn diagnostics(&self) -> Result<BotDiagnostics, MessengerError>;
}

/// Errors from the chat-bot collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessengerError {
    /// Missing bot token or chat id.
    #[error("messenger is not configured: {0}")]
    NotConfigured(String),

    /// The API answered `ok: false`.
    #[error("messenger API error: {description}")]
    Api {
        error_code: Option<i64>,
        description: String,
    },

    #[error("messenger request failed: {0}")]
    Transport(String),

    #[error("messenger request timed out")]
    Timeout,
}

impl MessengerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MessengerError::NotConfigured(_) => ErrorCode::NotConfigured,
            _ => ErrorCode::MessengerFailed,
        }
    }
}
