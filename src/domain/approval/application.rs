//! Application aggregate - one document awaiting a human decision.

use serde::{Deserialize, Serialize};

use super::{ApprovalError, ApprovalStatus, DecisionAction};
use crate::domain::document::DocumentCategory;
use crate::domain::foundation::{ApplicationToken, ShortId, StateMachine, Timestamp, ValidationError};
use crate::domain::verdict::AnalysisVerdict;

/// Location of a delivered chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

/// Input for creating an application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub company_name: String,
    pub responsible: String,
    pub filename: String,
    pub analysis: AnalysisVerdict,
    pub comment: Option<String>,
    pub download_url: Option<String>,
}

impl NewApplication {
    /// Validates the required submitter fields.
    ///
    /// Blank comments are dropped rather than rejected.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.company_name = require("company_name", self.company_name)?;
        self.responsible = require("responsible", self.responsible)?;
        self.filename = require("filename", self.filename)?;
        self.comment = self
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(self)
    }
}

fn require(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

/// A recorded decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: DecisionAction,
    pub actor: String,
    pub at: Timestamp,
}

impl Decision {
    pub fn new(action: DecisionAction, actor: impl Into<String>, at: Timestamp) -> Self {
        Self {
            action,
            actor: actor.into(),
            at,
        }
    }
}

/// The unit of work tracked through approval.
///
/// Identity and submitter fields are immutable; the only mutations are
/// [`Application::decide`] and attaching delivery metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    token: ApplicationToken,
    short_id: ShortId,
    company_name: String,
    responsible: String,
    filename: String,
    analysis: AnalysisVerdict,
    comment: Option<String>,
    status: ApprovalStatus,
    decided_by: Option<String>,
    decided_at: Option<Timestamp>,
    created_at: Timestamp,
    download_url: Option<String>,
    request_message: Option<MessageRef>,
    reconstructed: bool,
}

impl Application {
    /// Creates a pending application from validated input.
    pub fn create(
        token: ApplicationToken,
        short_id: ShortId,
        input: NewApplication,
        created_at: Timestamp,
    ) -> Self {
        Self {
            token,
            short_id,
            company_name: input.company_name,
            responsible: input.responsible,
            filename: input.filename,
            analysis: input.analysis,
            comment: input.comment,
            status: ApprovalStatus::PendingApproval,
            decided_by: None,
            decided_at: None,
            created_at,
            download_url: input.download_url,
            request_message: None,
            reconstructed: false,
        }
    }

    /// Builds a best-effort shell after the original record was lost.
    ///
    /// The verdict is unknown, so the conservative default is used.
    pub fn reconstructed(
        token: ApplicationToken,
        short_id: ShortId,
        fields: super::ReconstructedFields,
        request_message: Option<MessageRef>,
        now: Timestamp,
    ) -> Self {
        Self {
            token,
            short_id,
            company_name: fields.company_name,
            responsible: fields.responsible,
            filename: fields.filename,
            analysis: AnalysisVerdict::manual_review_default(),
            comment: fields.comment,
            status: ApprovalStatus::PendingApproval,
            decided_by: None,
            decided_at: None,
            created_at: now,
            download_url: None,
            request_message,
            reconstructed: true,
        }
    }

    /// Records a decision. Only the first decision is accepted.
    pub fn decide(&mut self, decision: Decision) -> Result<(), ApprovalError> {
        if self.status.is_terminal() {
            return Err(ApprovalError::AlreadyDecided {
                status: self.status,
                decided_by: self.decided_by.clone(),
            });
        }

        let next = self
            .status
            .transition_to(decision.action.target_status())
            .map_err(ApprovalError::InvalidTransition)?;

        self.status = next;
        self.decided_by = Some(decision.actor);
        self.decided_at = Some(decision.at);
        Ok(())
    }

    pub fn attach_request_message(&mut self, message: MessageRef) {
        self.request_message = Some(message);
    }

    /// Category derived from the verdict and filename.
    pub fn category(&self) -> DocumentCategory {
        DocumentCategory::classify(&self.analysis, &self.filename)
    }

    pub fn is_decided(&self) -> bool {
        self.status.is_terminal()
    }

    // === Accessors ===

    pub fn token(&self) -> &ApplicationToken {
        &self.token
    }

    pub fn short_id(&self) -> &ShortId {
        &self.short_id
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn responsible(&self) -> &str {
        &self.responsible
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn analysis(&self) -> &AnalysisVerdict {
        &self.analysis
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn status(&self) -> ApprovalStatus {
        self.status
    }

    pub fn decided_by(&self) -> Option<&str> {
        self.decided_by.as_deref()
    }

    pub fn decided_at(&self) -> Option<Timestamp> {
        self.decided_at
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    pub fn request_message(&self) -> Option<MessageRef> {
        self.request_message
    }

    /// True if this record was rebuilt from a rendered message.
    pub fn is_reconstructed(&self) -> bool {
        self.reconstructed
    }
}
