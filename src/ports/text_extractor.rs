//! Text Extractor Port - turning uploads into normalized text.

use crate::domain::document::{ExtractedText, ExtractionError, UploadedDocument};

/// Port for converting an uploaded document into normalized plain text.
///
/// # Contract
///
/// Implementations must:
/// - Dispatch on the declared media type, falling back to the filename
///   extension when it is absent or generic
/// - Reject a PDF without the `%PDF` prefix before scanning it
/// - Substitute the signed-PDF placeholder only when parsing failed and a
///   signature marker was found, tagging the result accordingly
/// - Return text already passed through `clean_and_check`
///
/// Extraction is CPU-bound and synchronous; async callers should run it on
/// the blocking pool.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, document: &UploadedDocument) -> Result<ExtractedText, ExtractionError>;
}
