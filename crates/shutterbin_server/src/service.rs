//! Upload and serve pipeline.

use chrono::Duration;
use shutterbin_core::{Clock, MediaKind, MediaRecord};
use shutterbin_database::{MediaRepository, NewMediaRecordRow};
use shutterbin_error::{MediaError, MediaErrorKind, QuotaError, QuotaErrorKind, ShutterbinResult};
use shutterbin_quota::{AdjustDirection, QuotaConfig, QuotaGate, UsageLedger};
use shutterbin_storage::MediaStorage;
use std::sync::Arc;

/// Core media service: admits uploads against the quota, persists file and
/// record, and serves records back until they expire.
///
/// The ledger is incremented only after both the backing file and the record
/// are durably persisted, so every increment corresponds to an existing
/// record. No lock spans the record store and the ledger; consistency between
/// them is eventual within a single request.
pub struct MediaService {
    storage: Arc<dyn MediaStorage>,
    repository: Arc<dyn MediaRepository>,
    ledger: Arc<UsageLedger>,
    gate: QuotaGate,
    clock: Arc<dyn Clock>,
    retention: Duration,
    max_file_bytes: u64,
}

impl MediaService {
    /// Wire up the service over its collaborators.
    pub fn new(
        storage: Arc<dyn MediaStorage>,
        repository: Arc<dyn MediaRepository>,
        ledger: Arc<UsageLedger>,
        clock: Arc<dyn Clock>,
        quota: &QuotaConfig,
        retention: Duration,
    ) -> Self {
        Self {
            storage,
            repository,
            gate: QuotaGate::new(ledger.clone(), quota),
            ledger,
            clock,
            retention,
            max_file_bytes: *quota.max_file_bytes(),
        }
    }

    /// Store an upload for `owner_address` and return the created record.
    ///
    /// # Errors
    ///
    /// Returns a quota error when the file exceeds the per-file ceiling or
    /// the address's cumulative cap, a storage error if the file cannot be
    /// written, or a database error if the record insert fails.
    #[tracing::instrument(skip(self, data), fields(size = data.len(), kind = %kind))]
    pub async fn upload(
        &self,
        owner_address: &str,
        kind: MediaKind,
        data: &[u8],
    ) -> ShutterbinResult<MediaRecord> {
        let size = data.len() as u64;

        if size > self.max_file_bytes {
            return Err(QuotaError::new(QuotaErrorKind::FileTooLarge {
                size,
                limit: self.max_file_bytes,
            })
            .into());
        }

        self.gate.admit(owner_address, size).into_result()?;

        let stored = self.storage.store(data, kind).await?;

        let created_at = self.clock.now().naive_utc();
        let new_record = NewMediaRecordRow::new(
            stored.stored_name,
            stored.storage_path.clone(),
            kind,
            owner_address,
            stored.byte_size,
            created_at,
            created_at + self.retention,
        );

        let record = match self.repository.create(new_record).await {
            Ok(record) => record,
            Err(err) => {
                // The record never existed, so the file must not either
                if let Err(cleanup) = self.storage.delete(&stored.storage_path).await {
                    tracing::warn!(
                        path = %stored.storage_path,
                        error = %cleanup,
                        "Failed to remove orphaned file after record insert failure"
                    );
                }
                return Err(err);
            }
        };

        self.ledger
            .adjust(owner_address, size, AdjustDirection::Add);

        tracing::info!(
            id = record.id,
            owner = owner_address,
            size,
            expires_at = %record.expires_at,
            "Stored upload"
        );

        Ok(record)
    }

    /// Fetch a record and its backing bytes for serving.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown or purged id, `Expired` when the
    /// retention window has elapsed (the record may not be purged yet), or a
    /// storage error if the backing file cannot be read.
    #[tracing::instrument(skip(self))]
    pub async fn serve(&self, id: i64) -> ShutterbinResult<(MediaRecord, Vec<u8>)> {
        let record = self
            .repository
            .find(id)
            .await?
            .ok_or_else(|| MediaError::new(MediaErrorKind::NotFound(id)))?;

        if record.is_expired(self.clock.now().naive_utc()) {
            return Err(MediaError::new(MediaErrorKind::Expired(id)).into());
        }

        let data = self.storage.retrieve(&record.storage_path).await?;
        Ok((record, data))
    }

    /// All records owned by `owner_address`.
    pub async fn list_for_owner(&self, owner_address: &str) -> ShutterbinResult<Vec<MediaRecord>> {
        self.repository.list_for_owner(owner_address).await
    }

    /// Bytes currently tracked for `owner_address`.
    pub fn usage(&self, owner_address: &str) -> u64 {
        self.ledger.usage(owner_address)
    }
}
