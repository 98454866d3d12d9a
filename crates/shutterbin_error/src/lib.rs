//! Error types for the shutterbin media sharing service.
//!
//! This crate provides the foundation error types used throughout the shutterbin
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use shutterbin_error::{ShutterbinResult, QuotaError, QuotaErrorKind};
//!
//! fn admit_upload() -> ShutterbinResult<()> {
//!     Err(QuotaError::new(QuotaErrorKind::Exceeded {
//!         used: 99 * 1024 * 1024,
//!         incoming: 2 * 1024 * 1024,
//!         cap: 100 * 1024 * 1024,
//!     }))?
//! }
//!
//! match admit_upload() {
//!     Ok(_) => println!("admitted"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
#[cfg(feature = "database")]
mod database;
mod error;
mod media;
mod quota;
mod server;
mod storage;

pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{ShutterbinError, ShutterbinErrorKind, ShutterbinResult};
pub use media::{MediaError, MediaErrorKind};
pub use quota::{QuotaError, QuotaErrorKind};
pub use server::{ServerError, ServerErrorKind};
pub use storage::{StorageError, StorageErrorKind};
