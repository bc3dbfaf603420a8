//! Local Filesystem Storage Adapter - Implementation of ArtifactStorage.
//!
//! Keeps raw uploads in a flat directory so they can be downloaded from the
//! approval card. Uses atomic writes and SHA-256 checksums.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::foundation::Timestamp;
use crate::ports::{ArtifactStorage, StorageError, StoredArtifact};

/// Longest sanitized filename kept in a key.
const MAX_NAME_CHARS: usize = 100;

/// Suffix used for in-flight writes.
const TEMP_SUFFIX: &str = ".tmp";

/// Flat-directory storage for uploaded documents.
///
/// # Keys
///
/// `{unix_millis}-{sanitized_filename}`, e.g. `1738400000000-Acme_NDA.pdf`.
/// Keys double as download filenames and are validated on every read, so a
/// key can never escape the upload directory.
///
/// # Atomic Writes
///
/// Content goes to `{key}.tmp`, is synced, then renamed into place.
#[derive(Debug, Clone)]
pub struct LocalArtifactStorage {
    base_path: PathBuf,
    public_base_url: Option<String>,
}

impl LocalArtifactStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            public_base_url: None,
        }
    }

    /// Sets the public URL prefix used to build download links.
    pub fn with_public_base_url(mut self, url: Option<String>) -> Self {
        self.public_base_url = url
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());
        self
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn download_url(&self, key: &str) -> Option<String> {
        self.public_base_url
            .as_ref()
            .map(|base| format!("{}/api/download/{}", base, key))
    }

    fn compute_checksum(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hex::encode(hasher.finalize())
    }

    /// Reduces a filename to ASCII letters, digits, `.`, `-` and `_`.
    fn sanitize(filename: &str) -> String {
        let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        let cleaned: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .take(MAX_NAME_CHARS)
            .collect();
        let cleaned = cleaned.trim_start_matches('.');
        if cleaned.is_empty() {
            "document".to_string()
        } else if let Some(stem) = cleaned.strip_suffix(TEMP_SUFFIX) {
            format!("{}_tmp", stem)
        } else {
            cleaned.to_string()
        }
    }

    fn validate_key(key: &str) -> Result<(), StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && !key.ends_with(TEMP_SUFFIX)
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if valid {
            Ok(())
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    async fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::Io(format!(
                "Failed to create upload directory {}: {}",
                self.base_path.display(),
                e
            ))
        })
    }

    async fn allocate_key(&self, filename: &str) -> Result<String, StorageError> {
        let millis = Timestamp::now().as_unix_millis();
        let name = Self::sanitize(filename);
        let mut key = format!("{}-{}", millis, name);
        let mut attempt = 1;
        while fs::try_exists(self.base_path.join(&key))
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?
        {
            key = format!("{}-{}-{}", millis, attempt, name);
            attempt += 1;
        }
        Ok(key)
    }
}

#[async_trait]
impl ArtifactStorage for LocalArtifactStorage {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<StoredArtifact, StorageError> {
        self.ensure_dir().await?;

        let key = self.allocate_key(filename).await?;
        let final_path = self.base_path.join(&key);
        let temp_path = self.base_path.join(format!("{}{}", key, TEMP_SUFFIX));

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            StorageError::Io(format!("Failed to create temp file {}: {}", temp_path.display(), e))
        })?;
        file.write_all(bytes).await.map_err(|e| {
            StorageError::Io(format!("Failed to write temp file {}: {}", temp_path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::Io(format!("Failed to sync temp file {}: {}", temp_path.display(), e))
        })?;
        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            StorageError::Io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })?;

        let artifact = StoredArtifact {
            download_url: self.download_url(&key),
            checksum: Self::compute_checksum(bytes),
            size: bytes.len() as u64,
            key,
        };
        tracing::info!(
            key = %artifact.key,
            size = artifact.size,
            checksum = %artifact.checksum,
            "Stored uploaded document"
        );
        Ok(artifact)
    }

    async fn open(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        Self::validate_key(key)?;
        let path = self.base_path.join(key);
        fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::Io(format!("Failed to read {}: {}", path.display(), e)),
        })
    }

    async fn sweep(&self, retention: Duration) -> Result<usize, StorageError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };

        let now = SystemTime::now();
        let mut removed = 0;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?
        {
            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to stat upload");
                    continue;
                }
            };

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();
            if age <= retention {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "Removed expired upload");
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload")
                }
            }
        }

        Ok(removed)
    }
}
