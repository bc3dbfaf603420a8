//! Decision actions and the callback payload that carries them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ApprovalStatus;
use crate::domain::foundation::ShortId;

/// A human decision on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    Approve,
    Reject,
    /// Escalate to the legal department.
    Lawyers,
}

impl DecisionAction {
    /// Parses the action part of a callback payload.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "approve" => Some(DecisionAction::Approve),
            "reject" => Some(DecisionAction::Reject),
            "lawyers" => Some(DecisionAction::Lawyers),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionAction::Approve => "approve",
            DecisionAction::Reject => "reject",
            DecisionAction::Lawyers => "lawyers",
        }
    }

    /// Status an application ends up in after this action.
    pub fn target_status(&self) -> ApprovalStatus {
        match self {
            DecisionAction::Approve => ApprovalStatus::Approved,
            DecisionAction::Reject => ApprovalStatus::Rejected,
            DecisionAction::Lawyers => ApprovalStatus::SentToLawyers,
        }
    }

    /// Callback data for a button, `<action>_<short_id>`.
    pub fn callback_data(&self, short_id: &ShortId) -> String {
        format!("{}_{}", self.as_str(), short_id)
    }
}

impl fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Action part of a callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Decide(DecisionAction),
    Unknown(String),
}

/// Parsed `<action>_<short_id>` callback payload.
///
/// The short id is kept raw; resolving it is the registry's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackPayload {
    pub action: CallbackAction,
    pub short_id: String,
}

impl CallbackPayload {
    /// Splits at the first underscore. Returns `None` when there is none.
    pub fn parse(data: &str) -> Option<Self> {
        let (action, short_id) = data.trim().split_once('_')?;
        let action = match DecisionAction::parse(action) {
            Some(decision) => CallbackAction::Decide(decision),
            None => CallbackAction::Unknown(action.to_string()),
        };
        Some(Self {
            action,
            short_id: short_id.to_string(),
        })
    }
}
