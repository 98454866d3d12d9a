//! Filesystem-based media storage implementation.
//!
//! Stores each upload as a single flat file under a per-kind subdirectory,
//! named by generation timestamp plus a random suffix.

use crate::{MediaStorage, StoredMedia};
use chrono::Utc;
use shutterbin_core::MediaKind;
use shutterbin_error::{ShutterbinResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

/// Filesystem storage backend.
///
/// Layout:
/// `{base_path}/{kind}/{timestamp}_{random}`
///
/// ```text
/// /var/shutterbin/media/
/// ├── images/
/// │   ├── 20250101_120000_9f3a1c42
/// │   └── 20250101_120207_04b7e911
/// └── videos/
///     └── 20250101_115859_6d22c8f0
/// ```
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-upload never leaves a partial file at a path a record could reference.
pub struct FileSystemStorage {
    base_path: PathBuf,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the base directory and the per-kind subdirectories if they
    /// don't exist, which also verifies the location is writable before the
    /// first upload arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> ShutterbinResult<Self> {
        let base_path = base_path.into();

        for dir in [
            base_path.clone(),
            base_path.join("images"),
            base_path.join("videos"),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
            })?;
        }

        tracing::info!(path = %base_path.display(), "Created filesystem storage");
        Ok(Self { base_path })
    }

    /// Generate an opaque, collision-resistant filename.
    ///
    /// UTC second-resolution timestamp plus four random bytes in hex; two
    /// uploads in the same second still get distinct names.
    fn generate_name() -> String {
        format!(
            "{}_{:08x}",
            Utc::now().format("%Y%m%d_%H%M%S"),
            rand::random::<u32>()
        )
    }

    /// Subdirectory for a media kind.
    fn kind_dir(kind: MediaKind) -> &'static str {
        match kind {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }
}

#[async_trait::async_trait]
impl MediaStorage for FileSystemStorage {
    #[tracing::instrument(skip(self, data), fields(size = data.len(), kind = %kind))]
    async fn store(&self, data: &[u8], kind: MediaKind) -> ShutterbinResult<StoredMedia> {
        let stored_name = Self::generate_name();
        let path = self.base_path.join(Self::kind_dir(kind)).join(&stored_name);

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(
            name = %stored_name,
            path = %path.display(),
            size = data.len(),
            kind = %kind,
            "Stored media file"
        );

        Ok(StoredMedia {
            stored_name,
            storage_path: path.to_string_lossy().to_string(),
            byte_size: data.len() as i64,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn retrieve(&self, storage_path: &str) -> ShutterbinResult<Vec<u8>> {
        let path = Path::new(storage_path);

        let data = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(storage_path.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(
            path = %path.display(),
            size = data.len(),
            "Retrieved media file"
        );

        Ok(data)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, storage_path: &str) -> ShutterbinResult<()> {
        let path = Path::new(storage_path);

        tokio::fs::remove_file(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(storage_path.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileDelete(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::info!(path = %path.display(), "Deleted media file");

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn exists(&self, storage_path: &str) -> ShutterbinResult<bool> {
        let path = Path::new(storage_path);
        Ok(tokio::fs::try_exists(path).await.unwrap_or(false))
    }
}
