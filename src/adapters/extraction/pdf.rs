//! PDF text extraction with the signed-document fallback.

use lopdf::Document;

use crate::domain::document::{
    clean_and_check, has_pdf_magic, scan_pdf, ExtractedText, ExtractionError, ExtractionMethod,
    SIGNED_PDF_PLACEHOLDER,
};

/// Raw output of a PDF parsing backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfText {
    pub text: String,
    pub page_count: u32,
}

/// A PDF parsing backend.
///
/// Kept behind a trait so the fallback policy can be exercised with a
/// backend that fails on purpose.
pub trait PdfTextEngine: Send + Sync {
    /// Parses the whole document. Errors are reported as text.
    fn extract(&self, bytes: &[u8]) -> Result<PdfText, String>;
}

/// Pure Rust backend built on `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfEngine;

impl PdfTextEngine for LopdfEngine {
    fn extract(&self, bytes: &[u8]) -> Result<PdfText, String> {
        let document = Document::load_mem(bytes).map_err(|e| e.to_string())?;
        if document.trailer.get(b"Encrypt").is_ok() {
            return Err("document is encrypted".to_string());
        }

        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        if pages.is_empty() {
            return Err("document has no pages".to_string());
        }

        let text = document.extract_text(&pages).map_err(|e| e.to_string())?;
        Ok(PdfText {
            text,
            page_count: pages.len() as u32,
        })
    }
}

/// PDF path of the extractor.
pub struct PdfExtractor {
    engine: Box<dyn PdfTextEngine>,
}

impl PdfExtractor {
    pub fn new(engine: Box<dyn PdfTextEngine>) -> Self {
        Self { engine }
    }

    /// Extracts text from a PDF.
    ///
    /// 1. `%PDF` prefix is required, checked before anything else.
    /// 2. The structural scan runs on every PDF.
    /// 3. If parsing fails and the scan saw a signature, the placeholder
    ///    text is returned tagged `signed_pdf_fallback`; otherwise the
    ///    parse error is returned.
    pub fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        if !has_pdf_magic(bytes) {
            return Err(ExtractionError::NotAPdf);
        }

        let diagnostics = scan_pdf(bytes);
        tracing::debug!(?diagnostics, "PDF structure scanned");

        match self.engine.extract(bytes) {
            Ok(parsed) => {
                let text = clean_and_check(&parsed.text)?;
                Ok(ExtractedText::new(text, ExtractionMethod::PdfText)
                    .with_diagnostics(diagnostics)
                    .with_page_count(parsed.page_count))
            }
            Err(reason) if diagnostics.has_signature => {
                tracing::warn!(
                    error = %reason,
                    size = diagnostics.size,
                    "PDF text extraction failed on a signed document, using placeholder text"
                );
                let text = clean_and_check(SIGNED_PDF_PLACEHOLDER)?;
                Ok(ExtractedText::new(text, ExtractionMethod::SignedPdfFallback)
                    .with_diagnostics(diagnostics))
            }
            Err(reason) => Err(ExtractionError::PdfParse(reason)),
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(Box::new(LopdfEngine))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Engine that always fails, like a parser choking on a signed PDF.
    pub(crate) struct FailingEngine;

    impl PdfTextEngine for FailingEngine {
        fn extract(&self, _bytes: &[u8]) -> Result<PdfText, String> {
            Err("invalid cross-reference table".to_string())
        }
    }

    struct FixedEngine(&'static str);

    impl PdfTextEngine for FixedEngine {
        fn extract(&self, _bytes: &[u8]) -> Result<PdfText, String> {
            Ok(PdfText {
                text: self.0.to_string(),
                page_count: 2,
            })
        }
    }

    /// Builds a one-page PDF containing `text`.
    pub(crate) fn build_pdf(text: &str) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    const SIGNED_STUB: &[u8] = b"%PDF-1.7\n1 0 obj << /Type /Sig /ByteRange [0 10 20 30] >> endobj\n";
    const UNSIGNED_STUB: &[u8] = b"%PDF-1.7\n1 0 obj << /Type /Catalog >> endobj\n";

    #[test]
    fn lopdf_extracts_text_from_a_real_pdf() {
        let bytes = build_pdf("Confidentiality agreement between Acme and Beta");
        let extracted = PdfExtractor::default().extract(&bytes).unwrap();

        assert_eq!(extracted.method, ExtractionMethod::PdfText);
        assert!(extracted.text.contains("Confidentiality agreement"));
        assert_eq!(extracted.page_count, Some(1));
        assert!(extracted.pdf_diagnostics.is_some());
    }

    #[test]
    fn missing_magic_fails_before_parsing() {
        // The failing engine would report PdfParse if it were reached.
        let extractor = PdfExtractor::new(Box::new(FailingEngine));
        assert_eq!(
            extractor.extract(b"<html>/Sig</html>").unwrap_err(),
            ExtractionError::NotAPdf
        );
    }

    #[test]
    fn signed_pdf_that_fails_to_parse_uses_placeholder() {
        let extractor = PdfExtractor::new(Box::new(FailingEngine));
        let extracted = extractor.extract(SIGNED_STUB).unwrap();

        assert_eq!(extracted.method, ExtractionMethod::SignedPdfFallback);
        assert!(extracted.method.is_fallback());
        assert!(extracted.text.starts_with("Соглашение о конфиденциальности"));
        assert!(extracted.pdf_diagnostics.unwrap().has_signature);
        assert!(extracted.page_count.is_none());
    }

    #[test]
    fn unsigned_pdf_that_fails_to_parse_propagates_error() {
        let extractor = PdfExtractor::new(Box::new(FailingEngine));
        assert!(matches!(
            extractor.extract(UNSIGNED_STUB),
            Err(ExtractionError::PdfParse(reason)) if reason.contains("cross-reference")
        ));
    }

    #[test]
    fn signed_pdf_that_parses_uses_real_text() {
        let extractor = PdfExtractor::new(Box::new(FixedEngine("Real   signed\n\n\ncontract text")));
        let extracted = extractor.extract(SIGNED_STUB).unwrap();
        assert_eq!(extracted.method, ExtractionMethod::PdfText);
        assert_eq!(extracted.text, "Real signed\ncontract text");
        assert_eq!(extracted.page_count, Some(2));
    }

    #[test]
    fn parsed_but_empty_pdf_is_empty_extraction() {
        let extractor = PdfExtractor::new(Box::new(FixedEngine("  \n ")));
        assert!(matches!(
            extractor.extract(SIGNED_STUB),
            Err(ExtractionError::EmptyExtraction { length: 0 })
        ));
    }

    #[test]
    fn garbage_after_magic_is_a_parse_error_with_lopdf() {
        let result = PdfExtractor::default().extract(UNSIGNED_STUB);
        assert!(matches!(result, Err(ExtractionError::PdfParse(_))));
    }
}
