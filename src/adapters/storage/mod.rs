//! Storage Adapters
//!
//! Implementations of the ArtifactStorage port for retaining raw uploads.
//!
//! ## Available Adapters
//!
//! - **LocalArtifactStorage** - Flat upload directory on local disk
//! - **UploadSweeper** - Background deletion of uploads past retention
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{LocalArtifactStorage, SweeperConfig, UploadSweeper};
//!
//! let storage = Arc::new(LocalArtifactStorage::new("uploads"));
//! let sweeper = UploadSweeper::new(storage.clone(), SweeperConfig::default());
//! tokio::spawn(async move { sweeper.run(shutdown_rx).await });
//! ```

mod local_artifact_storage;
mod sweeper;

pub use local_artifact_storage::LocalArtifactStorage;
pub use sweeper::{SweeperConfig, UploadSweeper};
