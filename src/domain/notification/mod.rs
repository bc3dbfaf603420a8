//! Notification module - chat messages for requests and decisions.

mod composer;
mod keyboard;
pub mod markdown;

pub use composer::{
    already_decided_ack, compose_approval_request, compose_decision, decision_ack, ComposedMessage,
    DecisionNotice, DEFAULT_SUMMARY, MALFORMED_ACK, STALE_ACK, UNKNOWN_ACTION_ACK,
};
pub use keyboard::{ButtonKind, DecisionKeyboard, InlineButton};
