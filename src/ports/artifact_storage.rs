//! ArtifactStorage port for retaining raw uploads

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during artifact storage operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Artifact not found
    #[error("artifact not found: {0}")]
    NotFound(String),
    /// Key contains path separators or other unsafe characters
    #[error("invalid artifact key: {0}")]
    InvalidKey(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

/// Reference to a stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    /// Storage key, also the download filename.
    pub key: String,
    /// Public URL, when a base URL is configured.
    pub download_url: Option<String>,
    /// Hex SHA-256 of the stored bytes.
    pub checksum: String,
    pub size: u64,
}

/// Storage for raw uploaded documents
#[async_trait]
pub trait ArtifactStorage: Send + Sync {
    /// Store an upload under a fresh key derived from its filename
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<StoredArtifact, StorageError>;

    /// Read a stored artifact back
    async fn open(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Delete artifacts older than `retention`, returning how many were removed
    async fn sweep(&self, retention: Duration) -> Result<usize, StorageError>;
}
