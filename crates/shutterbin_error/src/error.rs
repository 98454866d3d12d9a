//! Top-level error wrapper types.

use crate::{ConfigError, MediaError, QuotaError, ServerError, StorageError};
#[cfg(feature = "database")]
use crate::DatabaseError;

/// This is the foundation error enum. Each variant wraps the error type of
/// one shutterbin subsystem.
///
/// # Examples
///
/// ```
/// use shutterbin_error::{ShutterbinError, ConfigError};
///
/// let cfg_err = ConfigError::new("missing media_root");
/// let err: ShutterbinError = cfg_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ShutterbinErrorKind {
    /// Quota gate rejection
    #[from(QuotaError)]
    Quota(QuotaError),
    /// Media lookup failure (not found / expired)
    #[from(MediaError)]
    Media(MediaError),
    /// Backing file I/O failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Record store failure
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// HTTP serving error
    #[from(ServerError)]
    Server(ServerError),
}

/// Shutterbin error with kind discrimination.
///
/// # Examples
///
/// ```
/// use shutterbin_error::{ShutterbinResult, ConfigError};
///
/// fn might_fail() -> ShutterbinResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Shutterbin Error: {}", _0)]
pub struct ShutterbinError(Box<ShutterbinErrorKind>);

impl ShutterbinError {
    /// Create a new error from a kind.
    pub fn new(kind: ShutterbinErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ShutterbinErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ShutterbinErrorKind
impl<T> From<T> for ShutterbinError
where
    T: Into<ShutterbinErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for shutterbin operations.
///
/// # Examples
///
/// ```
/// use shutterbin_error::{ShutterbinResult, MediaError, MediaErrorKind};
///
/// fn fetch_record() -> ShutterbinResult<String> {
///     Err(MediaError::new(MediaErrorKind::NotFound(7)))?
/// }
/// ```
pub type ShutterbinResult<T> = std::result::Result<T, ShutterbinError>;
