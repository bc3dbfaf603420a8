//! Extraction adapters - Turning uploaded bytes into normalized text.
//!
//! - `CompositeTextExtractor` - Format dispatch, implements `TextExtractor`
//! - `PdfExtractor` - lopdf text layer plus the signed-PDF fallback
//! - `word` - DOCX via zip/quick-xml, legacy DOC via UTF-16 runs

mod pdf;
mod plain;
mod word;

pub use pdf::{LopdfEngine, PdfExtractor, PdfText, PdfTextEngine};
pub use plain::decode_text;
pub use word::{docx_text, legacy_doc_text, MIN_LEGACY_RUN};

use crate::domain::document::{
    clean_and_check, DocumentFormat, ExtractedText, ExtractionError, ExtractionMethod,
    UploadedDocument,
};
use crate::ports::TextExtractor;

/// Dispatches an upload to the extractor for its detected format.
#[derive(Default)]
pub struct CompositeTextExtractor {
    pdf: PdfExtractor,
}

impl CompositeTextExtractor {
    pub fn new(pdf: PdfExtractor) -> Self {
        Self { pdf }
    }
}

impl TextExtractor for CompositeTextExtractor {
    fn extract(&self, document: &UploadedDocument) -> Result<ExtractedText, ExtractionError> {
        let format = DocumentFormat::detect(document.mime_type.as_deref(), Some(&document.filename))?;

        let extracted = match format {
            DocumentFormat::Pdf => self.pdf.extract(&document.bytes)?,
            DocumentFormat::Docx => {
                let raw = docx_text(&document.bytes)?;
                ExtractedText::new(clean_and_check(&raw)?, ExtractionMethod::WordDocument)
            }
            DocumentFormat::Doc => {
                let (raw, method) = legacy_doc_text(&document.bytes)?;
                ExtractedText::new(clean_and_check(&raw)?, method)
            }
            DocumentFormat::PlainText | DocumentFormat::Rtf => {
                let raw = decode_text(&document.bytes);
                ExtractedText::new(clean_and_check(&raw)?, ExtractionMethod::PlainText)
            }
        };

        tracing::info!(
            filename = %document.filename,
            format = %format,
            method = ?extracted.method,
            chars = extracted.char_count(),
            "Text extracted"
        );

        Ok(extracted)
    }
}
