//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod approval;
pub mod intake;

#[cfg(test)]
pub(crate) mod test_support;

pub use approval::{
    CallbackMessage, CallbackOutcome, DecisionCallbackCommand, DecisionCallbackHandler,
};
pub use intake::{
    AnalyzeDocumentCommand, AnalyzeDocumentHandler, AnalyzeDocumentResult, ExtractionSummary,
    IntakeDocumentCommand, IntakeDocumentHandler, IntakeError, IntakeResult, RouteVerdictCommand,
    RouteVerdictHandler, RoutingOutcome,
};
