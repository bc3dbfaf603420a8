//! Best-effort recovery of application fields from a rendered request card.
//!
//! Used only when the in-memory record is gone but the short id still
//! resolves. Telegram returns the card as plain text with markup removed.

use once_cell::sync::Lazy;
use regex::Regex;

/// Value used for fields that could not be recovered.
pub const UNKNOWN_FIELD: &str = "Неизвестно";

pub const COMPANY_LABEL: &str = "Компания:";
pub const RESPONSIBLE_LABEL: &str = "Ответственный:";
pub const FILE_LABEL: &str = "Файл:";
pub const COMMENT_LABEL: &str = "Комментарий специалиста:";

static COMPANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Компания:[ \t]*(.+)").expect("valid company pattern"));
static RESPONSIBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Ответственный:[ \t]*(.+)").expect("valid responsible pattern"));
static FILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Файл:[ \t]*(.+)").expect("valid file pattern"));
static COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Комментарий специалиста:\s*(.+?)\s*$").expect("valid comment pattern")
});

/// Fields recovered from a rendered card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructedFields {
    pub company_name: String,
    pub responsible: String,
    pub filename: String,
    pub comment: Option<String>,
}

impl ReconstructedFields {
    /// Parses a rendered card. Missing labels yield [`UNKNOWN_FIELD`].
    pub fn parse(text: &str) -> Self {
        Self {
            company_name: capture(&COMPANY, text).unwrap_or_else(unknown),
            responsible: capture(&RESPONSIBLE, text).unwrap_or_else(unknown),
            filename: capture(&FILE, text).unwrap_or_else(unknown),
            comment: capture(&COMMENT, text),
        }
    }
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn unknown() -> String {
    UNKNOWN_FIELD.to_string()
}
