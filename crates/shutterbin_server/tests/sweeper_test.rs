//! Tests for the expiration sweeper.

mod common;

use chrono::Duration;
use common::harness;
use shutterbin_core::{Clock, MediaKind};
use shutterbin_database::MediaRepository;
use shutterbin_quota::QuotaConfig;
use shutterbin_storage::MediaStorage;

#[tokio::test]
async fn test_sweep_purges_expired_records() {
    let h = harness(QuotaConfig::default());

    let first = h
        .service
        .upload("10.0.0.1", MediaKind::Image, &[1u8; 100])
        .await
        .unwrap();
    let second = h
        .service
        .upload("10.0.0.2", MediaKind::Video, &[2u8; 250])
        .await
        .unwrap();

    h.clock.advance(Duration::hours(25));
    let purged = h.sweeper.sweep(h.clock.now().naive_utc()).await.unwrap();

    assert_eq!(purged, 2);
    assert!(h.repository.find(first.id).await.unwrap().is_none());
    assert!(h.repository.find(second.id).await.unwrap().is_none());
    assert!(!h.storage.exists(&first.storage_path).await.unwrap());
    assert!(!h.storage.exists(&second.storage_path).await.unwrap());
    assert_eq!(h.ledger.usage("10.0.0.1"), 0);
    assert_eq!(h.ledger.usage("10.0.0.2"), 0);
}

#[tokio::test]
async fn test_sweep_is_idempotent() {
    let h = harness(QuotaConfig::default());

    h.service
        .upload("10.0.0.1", MediaKind::Image, &[0u8; 100])
        .await
        .unwrap();

    h.clock.advance(Duration::hours(25));
    let now = h.clock.now().naive_utc();

    assert_eq!(h.sweeper.sweep(now).await.unwrap(), 1);
    assert_eq!(h.sweeper.sweep(now).await.unwrap(), 0);
}

#[tokio::test]
async fn test_sweep_leaves_live_records_alone() {
    let h = harness(QuotaConfig::default());

    let old = h
        .service
        .upload("10.0.0.1", MediaKind::Image, &[1u8; 100])
        .await
        .unwrap();

    h.clock.advance(Duration::hours(12));
    let young = h
        .service
        .upload("10.0.0.1", MediaKind::Image, &[2u8; 250])
        .await
        .unwrap();

    // 13 hours later the first upload is 25h old, the second 13h
    h.clock.advance(Duration::hours(13));
    let purged = h.sweeper.sweep(h.clock.now().naive_utc()).await.unwrap();

    assert_eq!(purged, 1);
    assert!(h.repository.find(old.id).await.unwrap().is_none());
    assert!(h.repository.find(young.id).await.unwrap().is_some());

    // Usage dropped by exactly the purged record's size
    assert_eq!(h.ledger.usage("10.0.0.1"), 250);

    let (_, bytes) = h.service.serve(young.id).await.unwrap();
    assert_eq!(bytes.len(), 250);
}

#[tokio::test]
async fn test_sweep_tolerates_missing_backing_file() {
    let h = harness(QuotaConfig::default());

    let record = h
        .service
        .upload("10.0.0.1", MediaKind::Image, &[0u8; 100])
        .await
        .unwrap();

    // Simulate a crash between a previous sweep's file delete and record
    // delete: the file is gone but the record remains
    h.storage.delete(&record.storage_path).await.unwrap();

    h.clock.advance(Duration::hours(25));
    let purged = h.sweeper.sweep(h.clock.now().naive_utc()).await.unwrap();

    assert_eq!(purged, 1);
    assert!(h.repository.find(record.id).await.unwrap().is_none());
    assert_eq!(h.ledger.usage("10.0.0.1"), 0);
}

#[tokio::test]
async fn test_sweep_with_nothing_expired() {
    let h = harness(QuotaConfig::default());

    h.service
        .upload("10.0.0.1", MediaKind::Image, &[0u8; 100])
        .await
        .unwrap();

    assert_eq!(h.sweeper.sweep(h.clock.now().naive_utc()).await.unwrap(), 0);
    assert_eq!(h.ledger.usage("10.0.0.1"), 100);
}
