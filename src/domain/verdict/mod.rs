//! Verdict module - the analysis collaborator's answer, normalized.

mod status;
#[allow(clippy::module_inception)]
mod verdict;

pub use status::{VerdictStatus, APPROVE_SYNONYMS};
pub use verdict::{AnalysisVerdict, MANUAL_REVIEW_STATUS};
