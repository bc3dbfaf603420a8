//! Approval-specific error types.

use thiserror::Error;

use super::ApprovalStatus;
use crate::domain::foundation::{ErrorCode, ValidationError};

/// Errors raised by the approval aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalError {
    /// A decision was already recorded; the first one wins.
    #[error("application already decided ({status})")]
    AlreadyDecided {
        status: ApprovalStatus,
        decided_by: Option<String>,
    },

    #[error("invalid transition: {0}")]
    InvalidTransition(ValidationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApprovalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApprovalError::AlreadyDecided { .. } => ErrorCode::AlreadyDecided,
            ApprovalError::InvalidTransition(_) | ApprovalError::Validation(_) => {
                ErrorCode::ValidationFailed
            }
        }
    }
}
