//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `extraction` - PDF, Word and plain-text extraction
//! - `analysis` - HTTP webhook to the analysis service
//! - `telegram` - Bot API client
//! - `storage` - Local upload directory and its sweeper
//! - `registry` - In-memory application registry and short-id purger
//! - `http` - Axum REST surface

pub mod analysis;
pub mod extraction;
pub mod http;
pub mod registry;
pub mod storage;
pub mod telegram;

pub use analysis::{WebhookAnalysisConfig, WebhookAnalysisService};
pub use extraction::CompositeTextExtractor;
pub use registry::{InMemoryApplicationRegistry, ShortIdPurger};
pub use storage::{LocalArtifactStorage, SweeperConfig, UploadSweeper};
pub use telegram::TelegramBotClient;
