//! Document format detection from media type and file extension.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ExtractionError;

/// Media type sent by browsers that do not know the file type.
const GENERIC_MIME: &str = "application/octet-stream";

/// Formats the extractor knows how to turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    /// Office Open XML word processing document.
    Docx,
    /// Legacy binary Word document.
    Doc,
    PlainText,
    Rtf,
}

impl DocumentFormat {
    /// Detects the format, preferring the declared media type.
    ///
    /// The extension is consulted only when the media type is absent or
    /// generic (`application/octet-stream`).
    pub fn detect(mime_type: Option<&str>, filename: Option<&str>) -> Result<Self, ExtractionError> {
        let declared = mime_type
            .map(|m| m.split(';').next().unwrap_or(m).trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty() && m != GENERIC_MIME);

        if let Some(mime) = declared {
            return Self::from_mime(&mime).ok_or(ExtractionError::UnsupportedFormat {
                detected: mime,
            });
        }

        let extension = filename
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        Self::from_extension(&extension).ok_or_else(|| ExtractionError::UnsupportedFormat {
            detected: if extension.is_empty() {
                "unknown".to_string()
            } else {
                format!(".{}", extension)
            },
        })
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" | "application/x-pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            "application/msword" => Some(Self::Doc),
            "text/plain" => Some(Self::PlainText),
            "application/rtf" | "text/rtf" => Some(Self::Rtf),
            _ => None,
        }
    }

    fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            "txt" | "text" => Some(Self::PlainText),
            "rtf" => Some(Self::Rtf),
            _ => None,
        }
    }

    /// Canonical media type, used when the upload did not declare one.
    pub fn canonical_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Doc => "application/msword",
            Self::PlainText => "text/plain",
            Self::Rtf => "application/rtf",
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Self::Docx | Self::Doc)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Doc => "doc",
            Self::PlainText => "txt",
            Self::Rtf => "rtf",
        };
        write!(f, "{}", s)
    }
}
