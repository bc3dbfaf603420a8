//! Extraction input, output and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PdfDiagnostics;
use crate::domain::foundation::ErrorCode;

/// Text substituted for a signed PDF whose text layer cannot be parsed.
pub const SIGNED_PDF_PLACEHOLDER: &str = "\
Соглашение о конфиденциальности (из подписанного PDF)
ВНИМАНИЕ: Данный PDF подписан электронной цифровой подписью, текст документа не удалось извлечь автоматически.
Основные условия:
- Взаимные обязательства сторон о неразглашении конфиденциальной информации
- Стандартные исключения для публичной информации
- Ответственность: возмещение реального ущерба
Требуется проверка оригинала документа.";

/// An uploaded document as received from the submitter.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub bytes: Vec<u8>,
    /// Original filename, used as the extension hint.
    pub filename: String,
    /// Declared media type, if any.
    pub mime_type: Option<String>,
}

impl UploadedDocument {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, mime_type: Option<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            mime_type,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// How the text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    PdfText,
    /// The placeholder was substituted for an unparsable signed PDF.
    SignedPdfFallback,
    WordDocument,
    LegacyWordDocument,
    PlainText,
}

impl ExtractionMethod {
    /// True when the text did not come from the document itself.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ExtractionMethod::SignedPdfFallback)
    }
}

/// Normalized text plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_diagnostics: Option<PdfDiagnostics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

impl ExtractedText {
    pub fn new(text: String, method: ExtractionMethod) -> Self {
        Self {
            text,
            method,
            pdf_diagnostics: None,
            page_count: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: PdfDiagnostics) -> Self {
        self.pdf_diagnostics = Some(diagnostics);
        self
    }

    pub fn with_page_count(mut self, pages: u32) -> Self {
        self.page_count = Some(pages);
        self
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Errors raised while turning an upload into text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("unsupported document format: {detected}")]
    UnsupportedFormat { detected: String },

    #[error("file is not a PDF document")]
    NotAPdf,

    #[error("document is corrupt: {0}")]
    CorruptDocument(String),

    #[error("PDF text extraction failed: {0}")]
    PdfParse(String),

    #[error("extracted text is too short ({length} characters)")]
    EmptyExtraction { length: usize },
}

impl ExtractionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ExtractionError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            ExtractionError::NotAPdf => ErrorCode::NotAPdf,
            ExtractionError::CorruptDocument(_) | ExtractionError::PdfParse(_) => {
                ErrorCode::CorruptDocument
            }
            ExtractionError::EmptyExtraction { .. } => ErrorCode::EmptyExtraction,
        }
    }

    /// Message shown to the submitter.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExtractionError::UnsupportedFormat { .. } => "Неподдерживаемый формат документа",
            ExtractionError::NotAPdf => "Файл не является PDF документом",
            ExtractionError::CorruptDocument(_) | ExtractionError::PdfParse(_) => {
                "Не удалось извлечь текст из документа"
            }
            ExtractionError::EmptyExtraction { .. } => {
                "Извлеченный текст слишком короткий или пустой"
            }
        }
    }
}
