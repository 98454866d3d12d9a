//! Quota error types.

/// Kinds of quota errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum QuotaErrorKind {
    /// Cumulative storage cap for the address would be exceeded
    #[display("Storage quota exceeded: {} used + {} incoming > {} cap", used, incoming, cap)]
    Exceeded {
        /// Bytes currently tracked for the address
        used: u64,
        /// Size of the rejected upload
        incoming: u64,
        /// Configured per-address cap
        cap: u64,
    },
    /// Single file exceeds the per-file size ceiling
    #[display("File size {} exceeds per-file limit {}", size, limit)]
    FileTooLarge {
        /// Size of the rejected upload
        size: u64,
        /// Configured per-file ceiling
        limit: u64,
    },
}

/// Quota error with location tracking.
///
/// Quota rejections are user-visible and recoverable: the client may retry
/// after expiration frees space.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Quota Error: {} at line {} in {}", kind, line, file)]
pub struct QuotaError {
    /// The kind of error that occurred
    pub kind: QuotaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl QuotaError {
    /// Create a new quota error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: QuotaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
