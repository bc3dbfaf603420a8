//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Length of a short identifier, in hex characters.
pub const SHORT_ID_LEN: usize = 8;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Primary key of an approval application.
///
/// A random base-36 string carrying the 122 random bits of a v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationToken(String);

impl ApplicationToken {
    /// Generates a fresh high-entropy token.
    pub fn generate() -> Self {
        Self(to_base36(Uuid::new_v4().as_u128()))
    }

    /// Wraps an existing token, returning error if empty or not base-36.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ValidationError::empty_field("token"));
        }
        if !token
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        {
            return Err(ValidationError::invalid_format(
                "token",
                "expected lowercase base-36 characters",
            ));
        }
        Ok(Self(token))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApplicationToken {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Compact callback correlation id (8 lowercase hex characters).
///
/// Fits inside Telegram's 64-byte `callback_data` next to the action name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortId(String);

impl ShortId {
    /// Generates a fresh random short id.
    pub fn generate() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self(simple[..SHORT_ID_LEN].to_string())
    }

    /// Parses a short id, requiring exactly 8 lowercase hex characters.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.len() != SHORT_ID_LEN
            || !value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(ValidationError::invalid_format(
                "short_id",
                format!("expected {} lowercase hex characters", SHORT_ID_LEN),
            ));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShortId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn to_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(25);
    while value > 0 {
        digits.push(BASE36_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
