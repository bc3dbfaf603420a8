//! Auto-approval policy.

use serde::{Deserialize, Serialize};

use crate::domain::document::DocumentCategory;
use crate::domain::verdict::VerdictStatus;

/// Actor recorded for unattended approvals.
pub const AI_ACTOR: &str = "AI";

/// Where a verdict goes after intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Routing {
    /// Approved without a human; no application is created.
    AutoApprove,
    /// Sent to the approval chat for a decision.
    ManualApproval,
}

/// Decides between auto- and manual approval.
///
/// Only NDAs with an approving verdict are trusted for unattended
/// approval. An approving verdict on a contract still goes to a human.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprovalPolicy;

impl AutoApprovalPolicy {
    pub fn evaluate(&self, category: DocumentCategory, status: VerdictStatus) -> Routing {
        if category == DocumentCategory::Nda && status.is_approvable() {
            Routing::AutoApprove
        } else {
            Routing::ManualApproval
        }
    }
}
