//! Process-wide usage ledger.

use std::collections::HashMap;
use std::sync::Mutex;

/// Direction of a ledger adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustDirection {
    /// Increase the tracked usage (upload committed)
    Add,
    /// Decrease the tracked usage (record purged)
    Remove,
}

/// In-memory mapping of owner address to cumulative bytes used.
///
/// All reads and writes go through one mutex over the whole map; the lock
/// is held only for a single read-modify-write, never across I/O. Entries
/// are created implicitly on first touch and never deleted; a stale zero
/// entry is harmless.
///
/// Removal saturates at zero. A remove racing with reconciliation must not
/// drive a counter negative, since a negative counter would wrongly admit
/// over-quota uploads.
#[derive(Debug, Default)]
pub struct UsageLedger {
    usage: Mutex<HashMap<String, u64>>,
}

impl UsageLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tracked bytes for `address`; zero if the address is unseen.
    pub fn usage(&self, address: &str) -> u64 {
        let usage = self.lock();
        usage.get(address).copied().unwrap_or(0)
    }

    /// Atomically apply `delta` to the address's counter.
    ///
    /// A total function over the map: adding creates the entry if missing,
    /// removing floors at zero.
    pub fn adjust(&self, address: &str, delta: u64, direction: AdjustDirection) {
        let mut usage = self.lock();
        let entry = usage.entry(address.to_string()).or_insert(0);
        *entry = match direction {
            AdjustDirection::Add => entry.saturating_add(delta),
            AdjustDirection::Remove => entry.saturating_sub(delta),
        };
        tracing::debug!(
            address,
            delta,
            ?direction,
            tracked = *entry,
            "Adjusted usage ledger"
        );
    }

    /// Number of addresses with a ledger entry.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no address has been tracked yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, u64>> {
        self.usage.lock().unwrap_or_else(|e| e.into_inner())
    }
}
