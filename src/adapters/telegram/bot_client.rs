//! Telegram Bot API client implementing `ChatMessenger`.
//!
//! # Configuration
//!
//! ```ignore
//! let config = TelegramClientConfig::new(Some(bot_token))
//!     .with_chat_id(Some("-1001234567890".into()))
//!     .with_channel_id(Some("@nda_decisions".into()));
//! let client = TelegramBotClient::new(config);
//! ```
//!
//! Every method posts JSON to `{api_base_url}/bot{token}/{method}` and
//! unwraps the `{ok, result, description}` envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::types::{ApiEnvelope, InlineKeyboardMarkup, Message};
use crate::domain::approval::MessageRef;
use crate::domain::notification::ComposedMessage;
use crate::ports::{BotDiagnostics, ChatMessenger, ChatTarget, MessengerError};

pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";
const PARSE_MODE: &str = "MarkdownV2";

/// Configuration for the bot client.
#[derive(Debug, Clone)]
pub struct TelegramClientConfig {
    bot_token: Option<Secret<String>>,
    /// Chat that receives approval requests.
    pub chat_id: Option<String>,
    /// Channel that receives decisions.
    pub channel_id: Option<String>,
    pub api_base_url: String,
    pub timeout: Duration,
}

impl TelegramClientConfig {
    pub fn new(bot_token: Option<Secret<String>>) -> Self {
        Self {
            bot_token: bot_token.filter(|t| !t.expose_secret().trim().is_empty()),
            chat_id: None,
            channel_id: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_chat_id(mut self, chat_id: Option<String>) -> Self {
        self.chat_id = chat_id.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_channel_id(mut self, channel_id: Option<String>) -> Self {
        self.channel_id = channel_id.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Bot API client.
pub struct TelegramBotClient {
    config: TelegramClientConfig,
    client: Client,
}

/// Chat ids are numeric for groups and `@name` for public channels.
fn chat_id_value(chat_id: &str) -> Value {
    match chat_id.trim().parse::<i64>() {
        Ok(id) => Value::from(id),
        Err(_) => Value::from(chat_id.trim()),
    }
}

impl TelegramBotClient {
    pub fn new(config: TelegramClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    fn method_url(&self, method: &str) -> Result<String, MessengerError> {
        let token = self
            .config
            .bot_token
            .as_ref()
            .ok_or_else(|| MessengerError::NotConfigured("bot token is not set".to_string()))?;
        Ok(format!(
            "{}/bot{}/{}",
            self.config.api_base_url,
            token.expose_secret(),
            method
        ))
    }

    fn target_chat(&self, target: ChatTarget) -> Result<&str, MessengerError> {
        let (chat, name) = match target {
            ChatTarget::ApprovalChat => (self.config.chat_id.as_deref(), "approval chat id"),
            ChatTarget::BroadcastChannel => (self.config.channel_id.as_deref(), "channel id"),
        };
        chat.ok_or_else(|| MessengerError::NotConfigured(format!("{} is not set", name)))
    }

    fn map_transport(err: reqwest::Error) -> MessengerError {
        if err.is_timeout() {
            MessengerError::Timeout
        } else {
            // reqwest errors carry the URL, which contains the token.
            MessengerError::Transport(err.without_url().to_string())
        }
    }

    /// Calls a Bot API method and returns its `result`.
    async fn call<T: DeserializeOwned>(&self, method: &str, payload: Value) -> Result<T, MessengerError> {
        let url = self.method_url(method)?;
        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let envelope: ApiEnvelope<T> = response.json().await.map_err(Self::map_transport)?;
        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| "unknown error".to_string());
            tracing::error!(method, error_code = ?envelope.error_code, %description, "Telegram API error");
            return Err(MessengerError::Api {
                error_code: envelope.error_code,
                description,
            });
        }

        envelope.result.ok_or_else(|| MessengerError::Api {
            error_code: None,
            description: format!("{} returned no result", method),
        })
    }

    fn message_payload(message: &ComposedMessage) -> Value {
        let mut payload = json!({
            "text": message.text,
            "parse_mode": PARSE_MODE,
            "disable_web_page_preview": true,
        });
        if let Some(keyboard) = &message.keyboard {
            payload["reply_markup"] = json!(InlineKeyboardMarkup::from(keyboard));
        }
        payload
    }

    /// Registers the webhook that receives callback updates.
    pub async fn register_webhook(
        &self,
        url: &str,
        secret_token: Option<&Secret<String>>,
    ) -> Result<(), MessengerError> {
        let mut payload = json!({
            "url": url,
            "allowed_updates": ["callback_query", "message"],
        });
        if let Some(secret) = secret_token {
            payload["secret_token"] = Value::from(secret.expose_secret().as_str());
        }

        let _: bool = self.call("setWebhook", payload).await?;
        tracing::info!(url, "Telegram webhook registered");
        Ok(())
    }
}

#[async_trait]
impl ChatMessenger for TelegramBotClient {
    fn ensure_configured(&self, target: ChatTarget) -> Result<(), MessengerError> {
        if self.config.bot_token.is_none() {
            return Err(MessengerError::NotConfigured("bot token is not set".to_string()));
        }
        self.target_chat(target).map(|_| ())
    }

    async fn send_message(
        &self,
        target: ChatTarget,
        message: &ComposedMessage,
    ) -> Result<MessageRef, MessengerError> {
        let chat_id = self.target_chat(target)?;
        let mut payload = Self::message_payload(message);
        payload["chat_id"] = chat_id_value(chat_id);

        let sent: Message = self.call("sendMessage", payload).await?;
        tracing::debug!(?target, message_id = sent.message_id, "Telegram message sent");
        Ok(MessageRef {
            chat_id: sent.chat.id,
            message_id: sent.message_id,
        })
    }

    async fn edit_message(
        &self,
        message_ref: MessageRef,
        message: &ComposedMessage,
    ) -> Result<(), MessengerError> {
        let mut payload = Self::message_payload(message);
        payload["chat_id"] = Value::from(message_ref.chat_id);
        payload["message_id"] = Value::from(message_ref.message_id);

        // Returns the edited Message, or `true` for inline messages.
        let _: Value = self.call("editMessageText", payload).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), MessengerError> {
        let payload = json!({
            "callback_query_id": callback_id,
            "text": text,
        });
        let _: bool = self.call("answerCallbackQuery", payload).await?;
        Ok(())
    }

    async fn diagnostics(&self) -> Result<BotDiagnostics, MessengerError> {
        let bot: Value = self.call("getMe", json!({})).await?;
        let webhook: Value = self.call("getWebhookInfo", json!({})).await?;
        Ok(BotDiagnostics {
            bot,
            webhook,
            chat_id: self.config.chat_id.clone(),
            channel_id: self.config.channel_id.clone(),
        })
    }
}
