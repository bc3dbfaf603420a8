//! Telegram adapters - Bot API client and webhook update types.

mod bot_client;
pub mod types;

pub use bot_client::{TelegramBotClient, TelegramClientConfig, DEFAULT_API_BASE_URL};
pub use types::{CallbackQuery, Update, User};
