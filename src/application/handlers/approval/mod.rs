//! Approval handlers.
//!
//! - `DecisionCallbackHandler` - approve/reject/escalate button presses

mod handle_decision_callback;

pub use handle_decision_callback::{
    CallbackMessage, CallbackOutcome, DecisionCallbackCommand, DecisionCallbackHandler,
};
