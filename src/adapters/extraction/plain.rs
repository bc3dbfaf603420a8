//! Plain text and RTF decoding.

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes bytes as UTF-8, replacing invalid sequences. A leading BOM is
/// dropped.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf8() {
        assert_eq!(decode_text("Соглашение".as_bytes()), "Соглашение");
    }

    #[test]
    fn strips_bom() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFhello"), "hello");
    }

    #[test]
    fn invalid_sequences_are_replaced() {
        assert_eq!(decode_text(b"ok\xFFok"), "ok\u{FFFD}ok");
    }
}
