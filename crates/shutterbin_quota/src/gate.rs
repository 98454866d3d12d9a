//! Quota admission gate.

use crate::{QuotaConfig, UsageLedger};
use shutterbin_error::{QuotaError, QuotaErrorKind};
use std::sync::Arc;

/// Outcome of a quota admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The upload fits under the cap
    Accepted,
    /// The upload would exceed the cap
    Rejected {
        /// Bytes tracked for the address at check time
        used: u64,
        /// Size of the rejected upload
        incoming: u64,
        /// Configured cap
        cap: u64,
    },
}

impl Admission {
    /// True when the upload was admitted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }

    /// Convert a rejection into the user-visible quota error.
    pub fn into_result(self) -> Result<(), QuotaError> {
        match self {
            Admission::Accepted => Ok(()),
            Admission::Rejected {
                used,
                incoming,
                cap,
            } => Err(QuotaError::new(QuotaErrorKind::Exceeded {
                used,
                incoming,
                cap,
            })),
        }
    }
}

/// Admission check comparing prospective usage to the configured cap.
///
/// The gate only reads the ledger; it never mutates it. The upload pipeline
/// increments the ledger after the file and record are durably persisted, so
/// ledger increments always correspond to an existing record. A rejection
/// has no side effects.
#[derive(Debug, Clone)]
pub struct QuotaGate {
    ledger: Arc<UsageLedger>,
    cap: u64,
}

impl QuotaGate {
    /// Create a gate over the shared ledger.
    pub fn new(ledger: Arc<UsageLedger>, config: &QuotaConfig) -> Self {
        Self {
            ledger,
            cap: *config.max_bytes_per_address(),
        }
    }

    /// Admit or reject an upload of `incoming` bytes from `address`.
    pub fn admit(&self, address: &str, incoming: u64) -> Admission {
        let used = self.ledger.usage(address);

        if used.saturating_add(incoming) > self.cap {
            tracing::info!(
                address,
                used,
                incoming,
                cap = self.cap,
                "Rejected upload over storage quota"
            );
            return Admission::Rejected {
                used,
                incoming,
                cap: self.cap,
            };
        }

        Admission::Accepted
    }

    /// The shared ledger behind this gate.
    pub fn ledger(&self) -> &Arc<UsageLedger> {
        &self.ledger
    }
}
