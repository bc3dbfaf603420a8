//! AnalyzeDocumentHandler - extraction followed by the analysis call.

use std::sync::Arc;

use super::IntakeError;
use crate::domain::document::{DocumentFormat, ExtractedText, UploadedDocument};
use crate::domain::verdict::AnalysisVerdict;
use crate::ports::{AnalysisRequest, AnalysisService, TextExtractor};

const GENERIC_MIME: &str = "application/octet-stream";

/// Command to analyze one uploaded document.
#[derive(Debug, Clone)]
pub struct AnalyzeDocumentCommand {
    pub document: UploadedDocument,
    pub responsible: String,
    pub company_name: String,
}

#[derive(Debug, Clone)]
pub struct AnalyzeDocumentResult {
    pub extracted: ExtractedText,
    pub verdict: AnalysisVerdict,
    /// Media type forwarded to the analysis service.
    pub mime_type: String,
}

pub struct AnalyzeDocumentHandler {
    extractor: Arc<dyn TextExtractor>,
    analysis: Arc<dyn AnalysisService>,
}

impl AnalyzeDocumentHandler {
    pub fn new(extractor: Arc<dyn TextExtractor>, analysis: Arc<dyn AnalysisService>) -> Self {
        Self { extractor, analysis }
    }

    pub async fn handle(
        &self,
        cmd: AnalyzeDocumentCommand,
    ) -> Result<AnalyzeDocumentResult, IntakeError> {
        let format = DocumentFormat::detect(cmd.document.mime_type.as_deref(), Some(&cmd.document.filename))?;
        let mime_type = forwarded_mime(cmd.document.mime_type.as_deref(), format);
        let filename = cmd.document.filename.clone();

        // Extraction is CPU-bound; keep it off the async workers.
        let extractor = self.extractor.clone();
        let document = cmd.document;
        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&document))
            .await
            .map_err(|e| IntakeError::Internal(format!("extraction task failed: {}", e)))??;

        if extracted.method.is_fallback() {
            tracing::warn!(filename = %filename, "Analyzing placeholder text for signed PDF");
        }

        let request = AnalysisRequest {
            extracted_text: extracted.text.clone(),
            filename,
            responsible: cmd.responsible,
            company_name: cmd.company_name,
            mime_type: mime_type.clone(),
        };
        let verdict = self.analysis.analyze(&request).await?;

        Ok(AnalyzeDocumentResult {
            extracted,
            verdict,
            mime_type,
        })
    }
}

/// The declared media type without parameters, or the canonical one when
/// the upload did not declare a useful type.
fn forwarded_mime(declared: Option<&str>, format: DocumentFormat) -> String {
    declared
        .map(|m| m.split(';').next().unwrap_or(m).trim())
        .filter(|m| !m.is_empty() && !m.eq_ignore_ascii_case(GENERIC_MIME))
        .map(str::to_string)
        .unwrap_or_else(|| format.canonical_mime().to_string())
}
