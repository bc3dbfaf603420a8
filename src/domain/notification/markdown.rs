//! Telegram MarkdownV2 escaping.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters MarkdownV2 treats as markup outside of entities.
pub const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("valid URL pattern"));

/// Punctuation that usually ends a sentence rather than a URL.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\''];

/// Escapes every reserved character.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes a URL for use as an inline link target.
///
/// Inside `(...)` only `)` and `\` need escaping.
pub fn escape_link_target(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        if c == ')' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Renders an inline link with escaped label and target.
pub fn link(label: &str, url: &str) -> String {
    format!("[{}]({})", escape(label), escape_link_target(url))
}

/// Escapes user text, turning embedded URLs into inline links.
///
/// The URL stays clickable because the link target is the raw URL; only
/// its visible label is escaped.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut cursor = 0;

    for found in URL.find_iter(text) {
        let url = found.as_str().trim_end_matches(URL_TRAILING);
        let end = found.start() + url.len();
        out.push_str(&escape(&text[cursor..found.start()]));
        out.push_str(&link(url, url));
        cursor = end;
    }
    out.push_str(&escape(&text[cursor..]));
    out
}
