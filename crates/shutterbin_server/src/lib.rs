//! Ephemeral media sharing server.
//!
//! Shutterbin stores uploaded images and videos for a fixed 24-hour
//! retention window and serves them back via generated links. Uploads are
//! limited per originating network address by cumulative byte quota.
//!
//! The moving parts, wired together here:
//! - [`MediaService`] admits uploads against the quota gate, persists the
//!   backing file and the durable record, and serves records until expiry.
//! - [`ExpirationSweeper`] purges expired records lazily at the start of
//!   every request.
//! - [`reconcile`] rebuilds the in-memory usage ledger from the record
//!   store at startup.
//! - [`router`] exposes the upload/list/serve HTTP surface.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod http;
mod observability;
mod reconcile;
mod service;
mod sweeper;

pub use config::ShutterbinConfig;
pub use http::{AppState, router};
pub use observability::init_observability;
pub use reconcile::reconcile;
pub use service::MediaService;
pub use sweeper::ExpirationSweeper;
