//! Tests for startup ledger reconciliation.

mod common;

use chrono::Duration;
use common::harness;
use shutterbin_core::{Clock, MediaKind};
use shutterbin_database::{MediaRepository, NewMediaRecordRow};
use shutterbin_quota::{QuotaConfig, UsageLedger};
use shutterbin_server::reconcile;

async fn seed_record(
    h: &common::Harness,
    owner: &str,
    size: i64,
    expires_in_hours: i64,
) -> i64 {
    let created = h.clock.now().naive_utc();
    let record = h
        .repository
        .create(NewMediaRecordRow::new(
            format!("seed_{owner}_{size}_{expires_in_hours}"),
            format!("/tmp/seed_{owner}_{size}_{expires_in_hours}"),
            MediaKind::Image,
            owner,
            size,
            created,
            created + Duration::hours(expires_in_hours),
        ))
        .await
        .unwrap();
    record.id
}

#[tokio::test]
async fn test_reconcile_rebuilds_usage_from_live_records() {
    let h = harness(QuotaConfig::default());

    seed_record(&h, "10.0.0.1", 100, 24).await;
    seed_record(&h, "10.0.0.1", 250, 12).await;
    seed_record(&h, "10.0.0.2", 999, 24).await;

    // A fresh ledger stands in for a restarted process
    let rebuilt = UsageLedger::new();
    let count = reconcile(
        h.repository.as_ref(),
        &rebuilt,
        h.clock.now().naive_utc(),
    )
    .await
    .unwrap();

    assert_eq!(count, 3);
    assert_eq!(rebuilt.usage("10.0.0.1"), 350);
    assert_eq!(rebuilt.usage("10.0.0.2"), 999);
}

#[tokio::test]
async fn test_reconcile_skips_expired_records() {
    let h = harness(QuotaConfig::default());

    seed_record(&h, "10.0.0.1", 100, 24).await;
    seed_record(&h, "10.0.0.1", 4000, -1).await;

    let rebuilt = UsageLedger::new();
    let count = reconcile(
        h.repository.as_ref(),
        &rebuilt,
        h.clock.now().naive_utc(),
    )
    .await
    .unwrap();

    assert_eq!(count, 1);
    assert_eq!(rebuilt.usage("10.0.0.1"), 100);
}

#[tokio::test]
async fn test_reconcile_on_empty_store() {
    let h = harness(QuotaConfig::default());

    let rebuilt = UsageLedger::new();
    let count = reconcile(
        h.repository.as_ref(),
        &rebuilt,
        h.clock.now().naive_utc(),
    )
    .await
    .unwrap();

    assert_eq!(count, 0);
    assert!(rebuilt.is_empty());
}

#[tokio::test]
async fn test_reconciled_usage_matches_store_sum() {
    let h = harness(QuotaConfig::default());

    // Mixed live and expired records for one owner
    seed_record(&h, "10.0.0.1", 111, 24).await;
    seed_record(&h, "10.0.0.1", 222, 6).await;
    seed_record(&h, "10.0.0.1", 333, -2).await;

    let rebuilt = UsageLedger::new();
    let now = h.clock.now().naive_utc();
    reconcile(h.repository.as_ref(), &rebuilt, now).await.unwrap();

    let live_sum: i64 = h
        .repository
        .live_after(now)
        .await
        .unwrap()
        .iter()
        .filter(|r| r.owner_address == "10.0.0.1")
        .map(|r| r.byte_size)
        .sum();

    assert_eq!(rebuilt.usage("10.0.0.1"), live_sum as u64);
}
