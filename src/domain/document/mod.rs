//! Document module - formats, normalization, PDF diagnostics and classification.
//!
//! Everything here is pure. Byte-level parsing of containers lives in
//! `adapters::extraction`; this module owns the rules applied around it.

mod category;
mod extraction;
mod format;
mod normalize;
mod pdf_scan;

pub use category::{DocumentCategory, Gender};
pub use extraction::{
    ExtractedText, ExtractionError, ExtractionMethod, UploadedDocument, SIGNED_PDF_PLACEHOLDER,
};
pub use format::DocumentFormat;
pub use normalize::{clean_and_check, clean_text, MIN_EXTRACTED_CHARS};
pub use pdf_scan::{has_pdf_magic, scan as scan_pdf, PdfDiagnostics, PDF_MAGIC, SCAN_WINDOW_BYTES};
