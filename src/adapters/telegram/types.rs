//! Telegram Bot API wire types.
//!
//! Only the fields the workflow reads are modeled; everything else in an
//! update is ignored by serde.

use serde::{Deserialize, Serialize};

use crate::domain::notification::{ButtonKind, DecisionKeyboard};

/// Response envelope shared by every Bot API method.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl User {
    /// Human-readable name used as the decision actor.
    pub fn display_name(&self) -> String {
        let full = match &self.last_name {
            Some(last) if !last.trim().is_empty() => format!("{} {}", self.first_name.trim(), last.trim()),
            _ => self.first_name.trim().to_string(),
        };
        if !full.is_empty() {
            return full;
        }
        match &self.username {
            Some(username) if !username.is_empty() => format!("@{}", username),
            _ => format!("id{}", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

/// Inbound webhook update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl From<&DecisionKeyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &DecisionKeyboard) -> Self {
        let inline_keyboard = keyboard
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| match &button.kind {
                        ButtonKind::Callback(data) => InlineKeyboardButton {
                            text: button.text.clone(),
                            callback_data: Some(data.clone()),
                            url: None,
                        },
                        ButtonKind::Url(url) => InlineKeyboardButton {
                            text: button.text.clone(),
                            callback_data: None,
                            url: Some(url.clone()),
                        },
                    })
                    .collect()
            })
            .collect();
        Self { inline_keyboard }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ShortId;

    #[test]
    fn callback_update_deserializes() {
        let json = r#"{
            "update_id": 10,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 7, "is_bot": false, "first_name": "Anna", "last_name": "Petrova"},
                "message": {"message_id": 55, "chat": {"id": -1001, "type": "group"}, "text": "card"},
                "chat_instance": "x",
                "data": "approve_0a1b2c3d"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let query = update.callback_query.unwrap();
        assert_eq!(query.data.as_deref(), Some("approve_0a1b2c3d"));
        assert_eq!(query.from.display_name(), "Anna Petrova");
        assert_eq!(query.message.unwrap().chat.id, -1001);
    }

    #[test]
    fn display_name_falls_back_to_username_then_id() {
        let mut user = User {
            id: 42,
            first_name: " ".to_string(),
            last_name: None,
            username: Some("legal_bob".to_string()),
        };
        assert_eq!(user.display_name(), "@legal_bob");
        user.username = None;
        assert_eq!(user.display_name(), "id42");
    }

    #[test]
    fn keyboard_maps_to_inline_markup() {
        let short_id = ShortId::parse("0a1b2c3d").unwrap();
        let keyboard = DecisionKeyboard::for_request(&short_id, Some("https://files/x.pdf"));
        let markup = InlineKeyboardMarkup::from(&keyboard);
        let json = serde_json::to_value(&markup).unwrap();

        assert_eq!(json["inline_keyboard"][0][0]["callback_data"], "approve_0a1b2c3d");
        assert!(json["inline_keyboard"][0][0].get("url").is_none());
        assert_eq!(json["inline_keyboard"][2][0]["url"], "https://files/x.pdf");
    }
}
