//! Core data types for the shutterbin media sharing service.
//!
//! This crate provides the foundation data types used across the shutterbin
//! workspace: the media record domain type, the media kind enum, the
//! injectable clock, and byte-size formatting.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bytes;
mod clock;
mod media_kind;
mod record;

pub use bytes::format_bytes;
pub use clock::{Clock, ManualClock, SystemClock};
pub use media_kind::MediaKind;
pub use record::MediaRecord;
