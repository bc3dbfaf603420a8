//! Analysis Service Port - the external document analysis collaborator.
//!
//! The collaborator is a black box (a workflow webhook in production) that
//! reads the extracted text and answers with a verdict.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::foundation::ErrorCode;
use crate::domain::verdict::AnalysisVerdict;

/// Payload sent to the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub extracted_text: String,
    pub filename: String,
    pub responsible: String,
    pub company_name: String,
    pub mime_type: String,
}

/// Port for document analysis.
///
/// Implementations must substitute [`AnalysisVerdict::manual_review_default`]
/// for a response body that is not a usable verdict. Only transport-level
/// failures and non-success statuses are errors.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisVerdict, AnalysisError>;
}

/// Errors from the analysis collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// No webhook URL configured.
    #[error("analysis service is not configured")]
    NotConfigured,

    /// The collaborator answered with a non-success status.
    #[error("analysis service returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("analysis request failed: {0}")]
    Transport(String),

    #[error("analysis request timed out after {secs}s")]
    Timeout { secs: u64 },
}

impl AnalysisError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalysisError::NotConfigured => ErrorCode::NotConfigured,
            _ => ErrorCode::UpstreamAnalysisFailed,
        }
    }
}
