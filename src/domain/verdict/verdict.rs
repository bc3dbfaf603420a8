//! AnalysisVerdict - the structured result of the external analysis.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::VerdictStatus;

/// Raw status used for the synthesized fallback verdict.
pub const MANUAL_REVIEW_STATUS: &str = "manual_review";

/// Verdict returned by the analysis collaborator.
///
/// Field names follow the collaborator's camelCase JSON. Unknown fields are
/// kept in `extra` so they reach the browser untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisVerdict {
    /// Raw status as sent by the collaborator.
    pub status: String,

    /// Model confidence in `[0, 1]`, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Free-text conclusion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub key_points: Vec<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub critical_issues: Vec<String>,

    /// Explicit document category, when the collaborator knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisVerdict {
    /// Creates a verdict with only a status.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            confidence: None,
            summary: None,
            key_points: Vec::new(),
            critical_issues: Vec::new(),
            document_type: None,
            extra: Map::new(),
        }
    }

    /// The conservative verdict used when the collaborator's answer is unusable.
    pub fn manual_review_default() -> Self {
        Self {
            confidence: Some(0.0),
            ..Self::new(MANUAL_REVIEW_STATUS)
        }
    }

    /// Sets the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the explicit document type.
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = Some(document_type.into());
        self
    }

    /// Sets the key points.
    pub fn with_key_points(mut self, points: Vec<String>) -> Self {
        self.key_points = points;
        self
    }

    /// Sets the critical issues.
    pub fn with_critical_issues(mut self, issues: Vec<String>) -> Self {
        self.critical_issues = issues;
        self
    }

    /// Sets the confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Status folded onto the closed vocabulary.
    pub fn normalized_status(&self) -> VerdictStatus {
        VerdictStatus::normalize(&self.status)
    }

    /// Parses a collaborator response body.
    ///
    /// Accepts a JSON object, or an array whose first element is the object
    /// (some workflow engines wrap single results). Returns a description of
    /// the problem when the body is not a usable verdict.
    pub fn parse_response_body(body: &str) -> Result<Self, String> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err("empty response body".to_string());
        }

        let value: Value = serde_json::from_str(trimmed).map_err(|e| e.to_string())?;
        let object = match value {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            Value::Array(_) => return Err("empty JSON array".to_string()),
            other => other,
        };

        let verdict: AnalysisVerdict =
            serde_json::from_value(object).map_err(|e| e.to_string())?;
        if verdict.status.trim().is_empty() {
            return Err("verdict status is blank".to_string());
        }
        Ok(verdict)
    }
}

/// Accepts `null`, a single string, or an array of strings/scalars.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) if s.trim().is_empty() => Vec::new(),
        Some(Value::String(s)) => vec![s],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Some(other) => vec![other.to_string()],
    })
}
