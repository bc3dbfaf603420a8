//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    // Intake
    AnalyzeDocumentCommand, AnalyzeDocumentHandler, AnalyzeDocumentResult, ExtractionSummary,
    IntakeDocumentCommand, IntakeDocumentHandler, IntakeError, IntakeResult,
    RouteVerdictCommand, RouteVerdictHandler, RoutingOutcome,
    // Approval callbacks
    CallbackMessage, CallbackOutcome, DecisionCallbackCommand, DecisionCallbackHandler,
};
