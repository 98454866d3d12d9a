//! Media file storage for shutterbin.
//!
//! This crate stores the backing bytes of uploaded media under generated
//! opaque filenames. Record metadata lives separately in the database; the
//! only coupling is the storage path carried on each record.
//!
//! Filenames are a UTC timestamp plus a random hex suffix
//! (`20250101_120000_9f3a1c42`), which keeps them collision-resistant without
//! leaking anything about the original upload.
//!
//! # Example
//!
//! ```rust
//! use shutterbin_core::MediaKind;
//! use shutterbin_storage::{FileSystemStorage, MediaStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FileSystemStorage::new("/tmp/shutterbin")?;
//!
//! let stored = storage.store(b"png bytes", MediaKind::Image).await?;
//! let bytes = storage.retrieve(&stored.storage_path).await?;
//! assert_eq!(bytes, b"png bytes");
//!
//! storage.delete(&stored.storage_path).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use shutterbin_core::MediaKind;
use shutterbin_error::ShutterbinResult;

mod filesystem;

pub use filesystem::FileSystemStorage;
pub use shutterbin_error::{StorageError, StorageErrorKind};

/// Handle to a freshly stored media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    /// Generated opaque filename
    pub stored_name: String,
    /// Absolute path to the backing bytes
    pub storage_path: String,
    /// Exact size written, in bytes
    pub byte_size: i64,
}

/// Trait for pluggable media storage backends.
///
/// Implementations persist and retrieve raw media bytes; record metadata is
/// managed separately in the database.
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Persist media bytes and return a handle to the stored file.
    ///
    /// The backend generates the filename; callers never choose storage
    /// paths. The write must be atomic so a crashed upload never leaves a
    /// partial file at a path a record could reference.
    async fn store(&self, data: &[u8], kind: MediaKind) -> ShutterbinResult<StoredMedia>;

    /// Read the backing bytes at `storage_path`.
    async fn retrieve(&self, storage_path: &str) -> ShutterbinResult<Vec<u8>>;

    /// Delete the backing file at `storage_path`.
    ///
    /// Returns a `StorageError` whose kind is `NotFound` when the file is
    /// already gone; the expiration sweeper treats that as success.
    async fn delete(&self, storage_path: &str) -> ShutterbinResult<()>;

    /// Check whether a backing file exists at `storage_path`.
    async fn exists(&self, storage_path: &str) -> ShutterbinResult<bool>;
}
