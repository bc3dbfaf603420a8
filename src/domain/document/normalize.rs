//! Text normalization applied to every extraction result.

use super::ExtractionError;

/// Cleaned text shorter than this (in characters) is treated as unusable.
pub const MIN_EXTRACTED_CHARS: usize = 10;

/// Normalizes extracted text.
///
/// NUL bytes are removed, whitespace runs inside a line become one space,
/// blank lines disappear (so newline runs become one newline), and the
/// result is trimmed.
pub fn clean_text(raw: &str) -> String {
    let without_nul = raw.replace('\0', "");
    without_nul
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cleans `raw` and rejects results below [`MIN_EXTRACTED_CHARS`].
pub fn clean_and_check(raw: &str) -> Result<String, ExtractionError> {
    let cleaned = clean_text(raw);
    let length = cleaned.chars().count();
    if length < MIN_EXTRACTED_CHARS {
        return Err(ExtractionError::EmptyExtraction { length });
    }
    Ok(cleaned)
}
