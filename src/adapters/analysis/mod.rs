//! Analysis adapters - Clients for the external verdict collaborator.

mod webhook;

pub use webhook::{WebhookAnalysisConfig, WebhookAnalysisService};
