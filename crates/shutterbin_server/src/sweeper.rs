//! Expiration sweeper.

use chrono::NaiveDateTime;
use shutterbin_core::format_bytes;
use shutterbin_database::MediaRepository;
use shutterbin_error::{ShutterbinErrorKind, ShutterbinResult};
use shutterbin_quota::{AdjustDirection, UsageLedger};
use shutterbin_storage::MediaStorage;
use std::sync::Arc;

/// Purges records whose retention window has elapsed, together with their
/// backing files and ledger usage.
///
/// The sweeper runs lazily at the start of every inbound request; there is
/// no background scheduler. Per record the order is: backing file, then
/// record, then ledger. The ledger is volatile, so crash safety only
/// constrains file-versus-record: a crash after the file delete but before
/// the record delete leaves an expired record behind, and the next sweep
/// purges it with the file delete reduced to a tolerated no-op. Decrementing
/// the ledger only after the record delete commits means a store failure
/// never leaves a partial ledger mutation.
pub struct ExpirationSweeper {
    storage: Arc<dyn MediaStorage>,
    repository: Arc<dyn MediaRepository>,
    ledger: Arc<UsageLedger>,
}

impl ExpirationSweeper {
    /// Wire up the sweeper over its collaborators.
    pub fn new(
        storage: Arc<dyn MediaStorage>,
        repository: Arc<dyn MediaRepository>,
        ledger: Arc<UsageLedger>,
    ) -> Self {
        Self {
            storage,
            repository,
            ledger,
        }
    }

    /// Purge every record expired as of `now`, returning how many were
    /// removed. Idempotent: a second sweep at the same instant purges
    /// nothing.
    ///
    /// # Errors
    ///
    /// A record whose backing file cannot be deleted is skipped and retried
    /// on the next sweep; only a record store failure aborts the batch.
    #[tracing::instrument(skip(self))]
    pub async fn sweep(&self, now: NaiveDateTime) -> ShutterbinResult<usize> {
        let expired = self.repository.expired_before(now).await?;
        let mut purged = 0;
        let mut freed: u64 = 0;

        for record in expired {
            if let Err(err) = self.storage.delete(&record.storage_path).await {
                match err.kind() {
                    ShutterbinErrorKind::Storage(storage_err) if storage_err.is_not_found() => {
                        // Logical expiration is authoritative; the file being
                        // gone already is fine
                        tracing::debug!(
                            id = record.id,
                            path = %record.storage_path,
                            "Backing file already gone"
                        );
                    }
                    _ => {
                        tracing::warn!(
                            id = record.id,
                            path = %record.storage_path,
                            error = %err,
                            "Failed to delete backing file, record kept for next sweep"
                        );
                        continue;
                    }
                }
            }

            // Store failure aborts the whole batch before any ledger change
            // for this record
            if self.repository.delete(record.id).await? {
                self.ledger.adjust(
                    &record.owner_address,
                    record.byte_size as u64,
                    AdjustDirection::Remove,
                );
                purged += 1;
                freed += record.byte_size as u64;
            }
        }

        if purged > 0 {
            tracing::info!(purged, freed = %format_bytes(freed), "Swept expired media");
        }

        Ok(purged)
    }
}
