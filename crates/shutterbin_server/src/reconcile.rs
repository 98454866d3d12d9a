//! Startup ledger reconciliation.

use chrono::NaiveDateTime;
use shutterbin_database::MediaRepository;
use shutterbin_error::ShutterbinResult;
use shutterbin_quota::{AdjustDirection, UsageLedger};

/// Rebuild the usage ledger from the durable record store.
///
/// Runs exactly once at process start, before any request is served. Every
/// record still live at `now` contributes its byte size to its owner's
/// counter; expired records are left for the first sweep. The ledger is a
/// derived cache of the store, so a crash that loses in-memory state costs
/// one full-table scan at restart, never quota accuracy.
///
/// # Errors
///
/// Returns a database error if the live-record scan fails.
pub async fn reconcile(
    repository: &dyn MediaRepository,
    ledger: &UsageLedger,
    now: NaiveDateTime,
) -> ShutterbinResult<usize> {
    let live = repository.live_after(now).await?;
    let count = live.len();

    for record in live {
        ledger.adjust(
            &record.owner_address,
            record.byte_size as u64,
            AdjustDirection::Add,
        );
    }

    tracing::info!(
        records = count,
        addresses = ledger.len(),
        "Reconciled usage ledger from record store"
    );

    Ok(count)
}
