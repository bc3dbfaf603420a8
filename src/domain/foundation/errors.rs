//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
///
/// These are the stable, machine-readable codes returned to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    PayloadTooLarge,

    // Extraction errors
    UnsupportedFormat,
    NotAPdf,
    CorruptDocument,
    EmptyExtraction,

    // Collaborator errors
    NotConfigured,
    UpstreamAnalysisFailed,
    MessengerFailed,
    StorageFailed,

    // Workflow errors
    ApplicationNotFound,
    AlreadyDecided,

    // Infrastructure errors
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorCode::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorCode::NotAPdf => "NOT_A_PDF",
            ErrorCode::CorruptDocument => "CORRUPT_DOCUMENT",
            ErrorCode::EmptyExtraction => "EMPTY_EXTRACTION",
            ErrorCode::NotConfigured => "NOT_CONFIGURED",
            ErrorCode::UpstreamAnalysisFailed => "UPSTREAM_ANALYSIS_FAILED",
            ErrorCode::MessengerFailed => "MESSENGER_FAILED",
            ErrorCode::StorageFailed => "STORAGE_FAILED",
            ErrorCode::ApplicationNotFound => "APPLICATION_NOT_FOUND",
            ErrorCode::AlreadyDecided => "ALREADY_DECIDED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}
