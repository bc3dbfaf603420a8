//! Document classification and category-aware Russian wording.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::verdict::AnalysisVerdict;

/// Category that selects approval policy and display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Nda,
    Contract,
    UnknownDocument,
}

/// Grammatical gender of the category noun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Masculine,
    Neuter,
}

const UNKNOWN_TYPES: [&str; 3] = ["unknown_document", "unknown", "документ"];

/// "NDA" as a standalone token; underscores and digits count as separators.
static NDA_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\p{L}])nda(?:$|[^\p{L}])").expect("valid NDA token pattern")
});

const NDA_KEYWORDS: [&str; 4] = ["non-disclosure", "confidential", "конфиденциальн", "неразглашен"];
const CONTRACT_KEYWORDS: [&str; 5] = ["contract", "agreement", "договор", "контракт", "соглашени"];

impl DocumentCategory {
    /// Classifies a document.
    ///
    /// An explicit `documentType` on the verdict wins. Otherwise keywords in
    /// the type, summary and filename decide, NDA keywords first. Pure: the
    /// same input always gives the same category.
    pub fn classify(verdict: &AnalysisVerdict, filename: &str) -> Self {
        if let Some(explicit) = verdict.document_type.as_deref().and_then(Self::from_explicit) {
            return explicit;
        }

        let haystack = format!(
            "{} {} {}",
            verdict.document_type.as_deref().unwrap_or_default(),
            verdict.summary.as_deref().unwrap_or_default(),
            filename
        )
        .to_lowercase();

        Self::from_keywords(&haystack).unwrap_or(DocumentCategory::UnknownDocument)
    }

    fn from_explicit(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        if UNKNOWN_TYPES.contains(&lowered.as_str()) {
            return Some(DocumentCategory::UnknownDocument);
        }
        Self::from_keywords(&lowered)
    }

    /// Expects lower-cased text.
    fn from_keywords(text: &str) -> Option<Self> {
        if NDA_TOKEN.is_match(text) || NDA_KEYWORDS.iter().any(|k| text.contains(k)) {
            Some(DocumentCategory::Nda)
        } else if CONTRACT_KEYWORDS.iter().any(|k| text.contains(k)) {
            Some(DocumentCategory::Contract)
        } else {
            None
        }
    }

    /// Nominative label, e.g. "Договор".
    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::Nda => "NDA",
            DocumentCategory::Contract => "Договор",
            DocumentCategory::UnknownDocument => "Документ",
        }
    }

    /// Genitive label, e.g. "согласование договора".
    pub fn label_genitive(&self) -> &'static str {
        match self {
            DocumentCategory::Nda => "NDA",
            DocumentCategory::Contract => "договора",
            DocumentCategory::UnknownDocument => "документа",
        }
    }

    pub fn gender(&self) -> Gender {
        match self {
            DocumentCategory::Nda => Gender::Neuter,
            DocumentCategory::Contract | DocumentCategory::UnknownDocument => Gender::Masculine,
        }
    }

    /// Past participle agreeing with the category noun.
    pub fn approved_word(&self) -> &'static str {
        match self.gender() {
            Gender::Neuter => "согласовано",
            Gender::Masculine => "согласован",
        }
    }

    pub fn rejected_word(&self) -> &'static str {
        match self.gender() {
            Gender::Neuter => "отклонено",
            Gender::Masculine => "отклонен",
        }
    }

    pub fn escalated_word(&self) -> &'static str {
        match self.gender() {
            Gender::Neuter => "направлено юристам",
            Gender::Masculine => "направлен юристам",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentCategory::Nda => "nda",
            DocumentCategory::Contract => "contract",
            DocumentCategory::UnknownDocument => "unknown_document",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict() -> AnalysisVerdict {
        AnalysisVerdict::new("approve")
    }

    #[test]
    fn explicit_document_type_wins() {
        let v = verdict()
            .with_document_type("Contract")
            .with_summary("Mutual NDA with standard terms");
        assert_eq!(DocumentCategory::classify(&v, "nda.pdf"), DocumentCategory::Contract);
    }

    #[test]
    fn explicit_russian_types_are_recognized() {
        let v = verdict().with_document_type("Договор поставки");
        assert_eq!(DocumentCategory::classify(&v, "x.pdf"), DocumentCategory::Contract);

        let v = verdict().with_document_type("конфиденциальность");
        assert_eq!(DocumentCategory::classify(&v, "x.pdf"), DocumentCategory::Nda);
    }

    #[test]
    fn descriptive_nda_types_are_recognized() {
        for raw in [
            "Mutual NDA",
            "Mutual Non-Disclosure Agreement",
            "Соглашение о неразглашении",
            "Соглашение о конфиденциальности",
            "NDA (one-way)",
        ] {
            let v = verdict().with_document_type(raw);
            assert_eq!(DocumentCategory::classify(&v, "doc.pdf"), DocumentCategory::Nda, "{raw}");
        }
    }

    #[test]
    fn descriptive_contract_types_are_recognized() {
        for raw in ["Service Agreement", "Supply contract", "Соглашение о сотрудничестве"] {
            let v = verdict().with_document_type(raw);
            assert_eq!(DocumentCategory::classify(&v, "doc.pdf"), DocumentCategory::Contract, "{raw}");
        }
    }

    #[test]
    fn explicit_unknown_is_respected() {
        let v = verdict().with_document_type("unknown_document");
        assert_eq!(DocumentCategory::classify(&v, "nda.pdf"), DocumentCategory::UnknownDocument);
    }

    #[test]
    fn unrecognized_type_falls_through_to_keywords() {
        let v = verdict()
            .with_document_type("memo")
            .with_summary("Соглашение о неразглашении");
        assert_eq!(DocumentCategory::classify(&v, "file.pdf"), DocumentCategory::Nda);
    }

    #[test]
    fn nda_keywords_take_priority_over_contract_keywords() {
        let v = verdict().with_summary("Confidentiality agreement between parties");
        assert_eq!(DocumentCategory::classify(&v, "doc.pdf"), DocumentCategory::Nda);
    }

    #[test]
    fn filename_is_a_keyword_source() {
        assert_eq!(
            DocumentCategory::classify(&verdict(), "supply_contract_2024.docx"),
            DocumentCategory::Contract
        );
        assert_eq!(
            DocumentCategory::classify(&verdict(), "NDA_Acme.pdf"),
            DocumentCategory::Nda
        );
    }

    #[test]
    fn nda_inside_a_word_is_not_a_keyword() {
        let v = verdict().with_summary("Standard terms, nothing unusual");
        assert_eq!(DocumentCategory::classify(&v, "scan.pdf"), DocumentCategory::UnknownDocument);
    }

    #[test]
    fn no_signal_means_unknown() {
        assert_eq!(
            DocumentCategory::classify(&verdict(), "scan_0001.pdf"),
            DocumentCategory::UnknownDocument
        );
    }

    #[test]
    fn classification_is_stable() {
        let v = verdict().with_summary("Договор оказания услуг");
        let first = DocumentCategory::classify(&v, "a.pdf");
        for _ in 0..3 {
            assert_eq!(DocumentCategory::classify(&v, "a.pdf"), first);
        }
    }

    #[test]
    fn wording_agrees_with_gender() {
        assert_eq!(DocumentCategory::Nda.approved_word(), "согласовано");
        assert_eq!(DocumentCategory::Contract.approved_word(), "согласован");
        assert_eq!(DocumentCategory::UnknownDocument.rejected_word(), "отклонен");
        assert_eq!(DocumentCategory::Contract.label_genitive(), "договора");
    }
}
