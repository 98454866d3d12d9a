//! Per-address storage quota tracking for shutterbin.
//!
//! Two pieces cooperate here. The [`UsageLedger`] is the process-wide,
//! in-memory map of address to bytes used, serialized through a single
//! mutex. The [`QuotaGate`] reads the ledger to admit or reject an upload
//! against the configured cap.
//!
//! The ledger is a derived cache of the record store: it is rebuilt from
//! durable records at startup and kept current by the upload pipeline and
//! the expiration sweeper. The gate's check-then-act is advisory; two
//! concurrent uploads from one address can both read usage before either
//! commits, so usage can overshoot the cap by at most the concurrency
//! degree times the largest single file. That bound is part of the design
//! and must not be "fixed" with a lock spanning persistence.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use shutterbin_quota::{Admission, QuotaConfig, QuotaGate, UsageLedger};
//!
//! let ledger = Arc::new(UsageLedger::new());
//! let gate = QuotaGate::new(ledger.clone(), &QuotaConfig::default());
//!
//! assert!(gate.admit("10.0.0.1", 1024).is_accepted());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod gate;
mod ledger;

pub use config::QuotaConfig;
pub use gate::{Admission, QuotaGate};
pub use ledger::{AdjustDirection, UsageLedger};
