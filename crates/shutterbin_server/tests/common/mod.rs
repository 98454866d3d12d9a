//! Shared test harness wiring the full service stack over temp directories.

#![allow(dead_code)]

use chrono::Duration;
use shutterbin_core::ManualClock;
use shutterbin_database::{SqliteMediaRepository, build_pool, run_migrations};
use shutterbin_quota::{QuotaConfig, UsageLedger};
use shutterbin_server::{ExpirationSweeper, MediaService};
use shutterbin_storage::FileSystemStorage;
use std::sync::Arc;
use tempfile::TempDir;

pub struct Harness {
    pub storage: Arc<FileSystemStorage>,
    pub repository: Arc<SqliteMediaRepository>,
    pub ledger: Arc<UsageLedger>,
    pub clock: Arc<ManualClock>,
    pub service: Arc<MediaService>,
    pub sweeper: ExpirationSweeper,
    _dir: TempDir,
}

pub fn harness(quota: QuotaConfig) -> Harness {
    let dir = TempDir::new().unwrap();

    let storage = Arc::new(FileSystemStorage::new(dir.path().join("media")).unwrap());

    let db_path = dir.path().join("records.db");
    let pool = build_pool(&db_path.to_string_lossy()).unwrap();
    run_migrations(&mut pool.get().unwrap()).unwrap();
    let repository = Arc::new(SqliteMediaRepository::new(pool));

    let ledger = Arc::new(UsageLedger::new());
    let clock = Arc::new(ManualClock::starting_now());

    let service = Arc::new(MediaService::new(
        storage.clone(),
        repository.clone(),
        ledger.clone(),
        clock.clone(),
        &quota,
        Duration::hours(24),
    ));
    let sweeper = ExpirationSweeper::new(storage.clone(), repository.clone(), ledger.clone());

    Harness {
        storage,
        repository,
        ledger,
        clock,
        service,
        sweeper,
        _dir: dir,
    }
}
