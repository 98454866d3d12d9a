//! Media lookup error types.

/// Kinds of media lookup errors.
///
/// `Expired` is distinct from `NotFound`: an expired record still exists in
/// the store until the sweeper purges it, and clients receive a "gone"
/// signal rather than a 404.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MediaErrorKind {
    /// No record exists for the requested id
    #[display("Media record {} not found", _0)]
    NotFound(i64),
    /// Record exists but its retention window has elapsed
    #[display("Media record {} has expired", _0)]
    Expired(i64),
    /// The media kind label was not recognized
    #[display("Unknown media kind: {}", _0)]
    UnknownKind(String),
}

/// Media lookup error with location tracking.
///
/// # Examples
///
/// ```
/// use shutterbin_error::{MediaError, MediaErrorKind};
///
/// let err = MediaError::new(MediaErrorKind::Expired(42));
/// assert!(format!("{}", err).contains("expired"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new media error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
