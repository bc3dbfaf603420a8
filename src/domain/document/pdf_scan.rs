//! Lightweight structural scan of a PDF, independent of full parsing.
//!
//! The scan only looks for byte markers. It never fails, so it can run on
//! files that the parser later rejects.

use serde::{Deserialize, Serialize};

/// Magic prefix every PDF starts with.
pub const PDF_MAGIC: &[u8] = b"%PDF";

/// Size of the head and tail windows searched for markers.
pub const SCAN_WINDOW_BYTES: usize = 64 * 1024;

/// Structural flags found in a PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfDiagnostics {
    pub has_signature: bool,
    pub is_encrypted: bool,
    pub has_images: bool,
    pub has_text: bool,
    pub has_fonts: bool,
    pub has_acro_form: bool,
    /// Header such as `%PDF-1.7`.
    pub pdf_version: String,
    pub size: usize,
}

/// Returns true if `bytes` starts with the PDF magic prefix.
pub fn has_pdf_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Scans the first and last [`SCAN_WINDOW_BYTES`] of the file.
///
/// Files up to twice the window are scanned whole, so no marker is split
/// between the two windows.
pub fn scan(bytes: &[u8]) -> PdfDiagnostics {
    let (head, tail): (&[u8], &[u8]) = if bytes.len() <= 2 * SCAN_WINDOW_BYTES {
        (bytes, &[])
    } else {
        (
            &bytes[..SCAN_WINDOW_BYTES],
            &bytes[bytes.len() - SCAN_WINDOW_BYTES..],
        )
    };

    let found = |marker: &[u8]| contains(head, marker) || contains(tail, marker);

    PdfDiagnostics {
        has_signature: found(b"/Sig") || found(b"/ByteRange"),
        is_encrypted: found(b"/Encrypt"),
        has_images: found(b"/Image") || found(b"/XObject"),
        has_text: found(b"/Text") || found(b"BT"),
        has_fonts: found(b"/Font"),
        has_acro_form: found(b"/AcroForm"),
        pdf_version: version_header(bytes),
        size: bytes.len(),
    }
}

fn version_header(bytes: &[u8]) -> String {
    let header = &bytes[..bytes.len().min(8)];
    String::from_utf8_lossy(header)
        .trim_end_matches(|c: char| c.is_whitespace() || c.is_control())
        .to_string()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}
