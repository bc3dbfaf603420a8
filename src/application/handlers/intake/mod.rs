//! Intake handlers.
//!
//! - `AnalyzeDocumentHandler` - extraction plus the analysis call
//! - `RouteVerdictHandler` - auto-approval or approval request
//! - `IntakeDocumentHandler` - the whole upload workflow

mod analyze_document;
mod errors;
mod intake_document;
mod route_verdict;

pub use analyze_document::{AnalyzeDocumentCommand, AnalyzeDocumentHandler, AnalyzeDocumentResult};
pub use errors::IntakeError;
pub use intake_document::{
    ExtractionSummary, IntakeDocumentCommand, IntakeDocumentHandler, IntakeResult,
};
pub use route_verdict::{RouteVerdictCommand, RouteVerdictHandler, RoutingOutcome};
