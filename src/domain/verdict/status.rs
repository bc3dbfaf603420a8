//! VerdictStatus - the closed vocabulary the workflow reasons about.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized analysis outcome.
///
/// The analysis collaborator speaks a loose vocabulary (`approve`,
/// `Auto-Approve`, `autoapproved`, ...). Everything is folded onto this enum
/// once, at the boundary, by [`VerdictStatus::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    /// The analysis considers the document safe to approve.
    Approve,
    /// The analysis recommends rejecting the document.
    Reject,
    /// A human must look at it. Also the fallback for anything unrecognized.
    ManualReview,
}

/// Raw status values accepted as an approval, compared case-insensitively.
pub const APPROVE_SYNONYMS: [&str; 5] =
    ["approve", "auto-approve", "auto_approve", "autoapproved", "approved"];

const REJECT_SYNONYMS: [&str; 4] = ["reject", "rejected", "decline", "declined"];

impl VerdictStatus {
    /// Maps a raw status string onto the closed vocabulary.
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if APPROVE_SYNONYMS.contains(&lowered.as_str()) {
            VerdictStatus::Approve
        } else if REJECT_SYNONYMS.contains(&lowered.as_str()) {
            VerdictStatus::Reject
        } else {
            VerdictStatus::ManualReview
        }
    }

    /// Returns true if the status allows unattended approval.
    pub fn is_approvable(&self) -> bool {
        matches!(self, VerdictStatus::Approve)
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerdictStatus::Approve => "approve",
            VerdictStatus::Reject => "reject",
            VerdictStatus::ManualReview => "manual_review",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_approve_synonym_normalizes_to_approve() {
        for raw in ["approve", "APPROVE", "Auto-Approve", "auto_approve", "AutoApproved", " approved "] {
            assert_eq!(VerdictStatus::normalize(raw), VerdictStatus::Approve, "{raw}");
        }
    }

    #[test]
    fn reject_synonyms_normalize_to_reject() {
        assert_eq!(VerdictStatus::normalize("Rejected"), VerdictStatus::Reject);
        assert_eq!(VerdictStatus::normalize("decline"), VerdictStatus::Reject);
    }

    #[test]
    fn anything_else_needs_manual_review() {
        for raw in ["", "manual_review", "review", "approve_with_changes", "ok"] {
            assert_eq!(VerdictStatus::normalize(raw), VerdictStatus::ManualReview, "{raw}");
        }
    }

    #[test]
    fn only_approve_is_approvable() {
        assert!(VerdictStatus::Approve.is_approvable());
        assert!(!VerdictStatus::Reject.is_approvable());
        assert!(!VerdictStatus::ManualReview.is_approvable());
    }
}
