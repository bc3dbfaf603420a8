//! Decision affordances attached to the approval request.

use serde::Serialize;

use crate::domain::approval::DecisionAction;
use crate::domain::foundation::ShortId;

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    /// Sends `callback_data` back through the webhook.
    Callback(String),
    /// Opens a URL.
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    pub text: String,
    pub kind: ButtonKind,
}

impl InlineButton {
    fn decision(text: &str, action: DecisionAction, short_id: &ShortId) -> Self {
        Self {
            text: text.to_string(),
            kind: ButtonKind::Callback(action.callback_data(short_id)),
        }
    }
}

/// Rows of inline buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl DecisionKeyboard {
    /// Approve/reject, escalate, and (when available) download.
    pub fn for_request(short_id: &ShortId, download_url: Option<&str>) -> Self {
        let mut rows = vec![
            vec![
                InlineButton::decision("✅ Согласовать", DecisionAction::Approve, short_id),
                InlineButton::decision("❌ Отклонить", DecisionAction::Reject, short_id),
            ],
            vec![InlineButton::decision("⚖️ Юристам", DecisionAction::Lawyers, short_id)],
        ];

        if let Some(url) = download_url.filter(|u| !u.is_empty()) {
            rows.push(vec![InlineButton {
                text: "📄 Скачать документ".to_string(),
                kind: ButtonKind::Url(url.to_string()),
            }]);
        }

        Self { rows }
    }

    /// Every callback payload on the keyboard.
    pub fn callback_payloads(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                ButtonKind::Callback(data) => Some(data.as_str()),
                ButtonKind::Url(_) => None,
            })
            .collect()
    }
}
