//! Approval module - the application aggregate and its state machine.
//!
//! # States
//!
//! ```text
//! intake ──┬── auto-approved (no application)
//!          └── pending_approval ──┬── approved
//!                                 ├── rejected
//!                                 └── sent_to_lawyers
//! ```

mod action;
mod application;
mod errors;
mod policy;
mod reconstruct;
mod status;

pub use action::{CallbackAction, CallbackPayload, DecisionAction};
pub use application::{Application, Decision, MessageRef, NewApplication};
pub use errors::ApprovalError;
pub use policy::{AutoApprovalPolicy, Routing, AI_ACTOR};
pub use reconstruct::{
    ReconstructedFields, COMMENT_LABEL, COMPANY_LABEL, FILE_LABEL, RESPONSIBLE_LABEL, UNKNOWN_FIELD,
};
pub use status::ApprovalStatus;
