//! Tests for the upload and serve pipeline.

mod common;

use chrono::Duration;
use common::harness;
use shutterbin_core::MediaKind;
use shutterbin_database::MediaRepository;
use shutterbin_error::{MediaErrorKind, QuotaErrorKind, ShutterbinErrorKind};
use shutterbin_quota::{AdjustDirection, QuotaConfig};

const MIB: u64 = 1024 * 1024;
const KIB: u64 = 1024;

#[tokio::test]
async fn test_upload_round_trip() {
    let h = harness(QuotaConfig::default());

    let data = vec![7u8; 1000];
    let record = h
        .service
        .upload("10.0.0.1", MediaKind::Image, &data)
        .await
        .unwrap();

    assert_eq!(record.byte_size, 1000);
    assert_eq!(record.owner_address, "10.0.0.1");
    assert_eq!(record.expires_at, record.created_at + Duration::hours(24));
    assert_eq!(h.service.usage("10.0.0.1"), 1000);

    let (served, bytes) = h.service.serve(record.id).await.unwrap();
    assert_eq!(served.byte_size, 1000);
    assert_eq!(bytes, data);
}

#[tokio::test]
async fn test_expired_is_distinct_from_not_found() {
    let h = harness(QuotaConfig::default());

    let record = h
        .service
        .upload("10.0.0.1", MediaKind::Video, b"mp4 bytes")
        .await
        .unwrap();

    // Before expiry the record serves normally
    assert!(h.service.serve(record.id).await.is_ok());

    h.clock.advance(Duration::hours(25));

    let err = h.service.serve(record.id).await.unwrap_err();
    match err.kind() {
        ShutterbinErrorKind::Media(e) => {
            assert!(matches!(e.kind, MediaErrorKind::Expired(id) if id == record.id));
        }
        other => panic!("expected media error, got {other}"),
    }

    let err = h.service.serve(record.id + 999).await.unwrap_err();
    match err.kind() {
        ShutterbinErrorKind::Media(e) => {
            assert!(matches!(e.kind, MediaErrorKind::NotFound(_)));
        }
        other => panic!("expected media error, got {other}"),
    }
}

#[tokio::test]
async fn test_quota_rejection_at_the_margin() {
    let h = harness(QuotaConfig::with_cap(100 * MIB));
    h.ledger
        .adjust("10.0.0.1", 99 * MIB, AdjustDirection::Add);

    // 99 MiB used + 2 MiB > 100 MiB cap
    let err = h
        .service
        .upload("10.0.0.1", MediaKind::Image, &vec![0u8; 2 * MIB as usize])
        .await
        .unwrap_err();
    match err.kind() {
        ShutterbinErrorKind::Quota(e) => {
            assert!(matches!(e.kind, QuotaErrorKind::Exceeded { .. }));
        }
        other => panic!("expected quota error, got {other}"),
    }

    // 99 MiB + 1 MiB lands exactly on the cap and is admitted
    h.service
        .upload("10.0.0.1", MediaKind::Image, &vec![0u8; MIB as usize])
        .await
        .unwrap();
    assert_eq!(h.ledger.usage("10.0.0.1"), 100 * MIB);
}

#[tokio::test]
async fn test_rejected_upload_leaves_no_trace() {
    let h = harness(QuotaConfig::with_cap(KIB));

    let err = h
        .service
        .upload("10.0.0.1", MediaKind::Image, &vec![0u8; 2 * KIB as usize])
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ShutterbinErrorKind::Quota(_)));

    assert_eq!(h.ledger.usage("10.0.0.1"), 0);
    assert!(h.repository.list_for_owner("10.0.0.1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_per_file_ceiling() {
    let h = harness(QuotaConfig::new(100 * MIB, 10));

    let err = h
        .service
        .upload("10.0.0.1", MediaKind::Image, &[0u8; 11])
        .await
        .unwrap_err();
    match err.kind() {
        ShutterbinErrorKind::Quota(e) => {
            assert!(matches!(e.kind, QuotaErrorKind::FileTooLarge { size: 11, limit: 10 }));
        }
        other => panic!("expected quota error, got {other}"),
    }
}

#[tokio::test]
async fn test_second_large_upload_rejected_after_commit() {
    let h = harness(QuotaConfig::with_cap(100 * KIB));
    let payload = vec![0u8; 60 * KIB as usize];

    h.service
        .upload("10.0.0.1", MediaKind::Image, &payload)
        .await
        .unwrap();

    // 60 + 60 > 100: once the first commit lands, the second must reject
    let err = h
        .service
        .upload("10.0.0.1", MediaKind::Image, &payload)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ShutterbinErrorKind::Quota(_)));
    assert_eq!(h.ledger.usage("10.0.0.1"), 60 * KIB);
}

#[tokio::test]
async fn test_concurrent_uploads_overshoot_is_bounded() {
    let h = harness(QuotaConfig::with_cap(100 * KIB));
    let payload = vec![0u8; 60 * KIB as usize];

    // Both admits may read the ledger before either commit lands; that race
    // is allowed, but the overshoot is bounded by one payload
    let (a, b) = tokio::join!(
        h.service.upload("10.0.0.1", MediaKind::Image, &payload),
        h.service.upload("10.0.0.1", MediaKind::Image, &payload),
    );

    let accepted = [&a, &b].iter().filter(|r| r.is_ok()).count() as u64;
    assert!(accepted >= 1);

    let usage = h.ledger.usage("10.0.0.1");
    assert_eq!(usage, accepted * 60 * KIB);
    assert!(usage <= 100 * KIB + 60 * KIB);
}
