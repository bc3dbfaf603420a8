//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TextExtractor` - Upload to normalized text
//! - `AnalysisService` - External verdict producer
//! - `ChatMessenger` - Chat-bot send/edit/acknowledge
//! - `ArtifactStorage` - Raw upload retention and cleanup
//! - `ApplicationRegistry` - Application state and callback correlation

mod analysis_service;
mod application_registry;
mod artifact_storage;
mod chat_messenger;
mod text_extractor;

pub use analysis_service::{AnalysisError, AnalysisRequest, AnalysisService};
pub use application_registry::{ApplicationRegistry, RegistryError};
pub use artifact_storage::{ArtifactStorage, StorageError, StoredArtifact};
pub use chat_messenger::{BotDiagnostics, ChatMessenger, ChatTarget, MessengerError};
pub use text_extractor::TextExtractor;
