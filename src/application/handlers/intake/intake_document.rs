//! IntakeDocumentHandler - the full upload workflow.
//!
//! store (best effort) → extract → analyze → classify → route

use std::sync::Arc;

use serde::Serialize;

use super::{
    AnalyzeDocumentCommand, AnalyzeDocumentHandler, IntakeError, RouteVerdictCommand,
    RouteVerdictHandler, RoutingOutcome,
};
use crate::domain::document::{
    DocumentCategory, ExtractedText, ExtractionMethod, PdfDiagnostics, UploadedDocument,
};
use crate::domain::foundation::ValidationError;
use crate::domain::verdict::AnalysisVerdict;
use crate::ports::{ArtifactStorage, StoredArtifact};

/// Command to take in one uploaded document.
#[derive(Debug, Clone)]
pub struct IntakeDocumentCommand {
    pub document: UploadedDocument,
    pub responsible: String,
    pub company_name: String,
    pub comment: Option<String>,
}

/// Extraction facts returned to the submitter; the text itself stays
/// server-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSummary {
    pub method: ExtractionMethod,
    pub char_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_diagnostics: Option<PdfDiagnostics>,
}

impl From<&ExtractedText> for ExtractionSummary {
    fn from(extracted: &ExtractedText) -> Self {
        Self {
            method: extracted.method,
            char_count: extracted.char_count(),
            page_count: extracted.page_count,
            pdf_diagnostics: extracted.pdf_diagnostics.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntakeResult {
    pub verdict: AnalysisVerdict,
    pub category: DocumentCategory,
    pub extraction: ExtractionSummary,
    /// `None` when storage failed; the workflow continues without a link.
    pub stored: Option<StoredArtifact>,
    pub routing: RoutingOutcome,
}

pub struct IntakeDocumentHandler {
    storage: Arc<dyn ArtifactStorage>,
    analyzer: Arc<AnalyzeDocumentHandler>,
    router: Arc<RouteVerdictHandler>,
}

impl IntakeDocumentHandler {
    pub fn new(
        storage: Arc<dyn ArtifactStorage>,
        analyzer: Arc<AnalyzeDocumentHandler>,
        router: Arc<RouteVerdictHandler>,
    ) -> Self {
        Self {
            storage,
            analyzer,
            router,
        }
    }

    pub async fn handle(&self, cmd: IntakeDocumentCommand) -> Result<IntakeResult, IntakeError> {
        let responsible = required("responsible", &cmd.responsible)?;
        let company_name = required("company_name", &cmd.company_name)?;
        let filename = cmd.document.filename.clone();

        tracing::info!(
            filename = %filename,
            size = cmd.document.size(),
            company = %company_name,
            "Document received"
        );

        let stored = match self.storage.store(&filename, &cmd.document.bytes).await {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                tracing::warn!(error = %e, filename = %filename, "Upload not stored, continuing without download link");
                None
            }
        };

        let analyzed = self
            .analyzer
            .handle(AnalyzeDocumentCommand {
                document: cmd.document,
                responsible: responsible.clone(),
                company_name: company_name.clone(),
            })
            .await?;

        let category = DocumentCategory::classify(&analyzed.verdict, &filename);

        let routing = self
            .router
            .handle(RouteVerdictCommand {
                company_name,
                responsible,
                filename,
                analysis: analyzed.verdict.clone(),
                comment: cmd.comment,
                download_url: stored.as_ref().and_then(|s| s.download_url.clone()),
            })
            .await?;

        Ok(IntakeResult {
            verdict: analyzed.verdict,
            category,
            extraction: ExtractionSummary::from(&analyzed.extracted),
            stored,
            routing,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}
