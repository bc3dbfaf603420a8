//! Approval lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Status of an application awaiting (or past) a human decision.
///
/// Auto-approved documents never get an application, so there is no
/// `AutoApproved` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    PendingApproval,
    Approved,
    Rejected,
    SentToLawyers,
}

impl StateMachine for ApprovalStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ApprovalStatus::*;
        matches!(
            (self, target),
            (PendingApproval, Approved) | (PendingApproval, Rejected) | (PendingApproval, SentToLawyers)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ApprovalStatus::*;
        match self {
            PendingApproval => vec![Approved, Rejected, SentToLawyers],
            Approved | Rejected | SentToLawyers => vec![],
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApprovalStatus::PendingApproval => "pending_approval",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::SentToLawyers => "sent_to_lawyers",
        };
        write!(f, "{}", s)
    }
}
