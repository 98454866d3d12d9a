//! SQLite record store for shutterbin.
//!
//! This crate owns the durable side of the system: the media record table,
//! its migrations, and the repository used by the upload pipeline, the
//! expiration sweeper, and the startup reconciler.
//!
//! # Example
//!
//! ```rust,ignore
//! use shutterbin_database::{build_pool, run_migrations, SqliteMediaRepository};
//!
//! let pool = build_pool("shutterbin.db")?;
//! run_migrations(&mut pool.get()?)?;
//! let repo = SqliteMediaRepository::new(pool);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod models;
mod repository;

// Public module for external query building in tests
pub mod schema;

pub use connection::{MIGRATIONS, SqlitePool, build_pool, establish_connection, run_migrations};
pub use models::{MediaRecordRow, NewMediaRecordRow};
pub use repository::{MediaRepository, SqliteMediaRepository};

use shutterbin_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
