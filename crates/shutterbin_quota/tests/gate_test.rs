//! Tests for the quota admission gate.

use shutterbin_error::QuotaErrorKind;
use shutterbin_quota::{Admission, AdjustDirection, QuotaConfig, QuotaGate, UsageLedger};
use std::sync::Arc;

const MIB: u64 = 1024 * 1024;

fn gate_with_cap(cap: u64) -> QuotaGate {
    QuotaGate::new(Arc::new(UsageLedger::new()), &QuotaConfig::with_cap(cap))
}

#[test]
fn test_fresh_address_is_admitted() {
    let gate = gate_with_cap(100 * MIB);
    assert!(gate.admit("10.0.0.1", 50 * MIB).is_accepted());
}

#[test]
fn test_rejection_at_the_margin() {
    let gate = gate_with_cap(100 * MIB);
    gate.ledger()
        .adjust("10.0.0.1", 99 * MIB, AdjustDirection::Add);

    // 99 + 2 > 100: rejected
    match gate.admit("10.0.0.1", 2 * MIB) {
        Admission::Rejected {
            used,
            incoming,
            cap,
        } => {
            assert_eq!(used, 99 * MIB);
            assert_eq!(incoming, 2 * MIB);
            assert_eq!(cap, 100 * MIB);
        }
        Admission::Accepted => panic!("expected rejection"),
    }

    // 99 + 1 = 100: exactly at the cap is still admitted
    assert!(gate.admit("10.0.0.1", MIB).is_accepted());
}

#[test]
fn test_rejection_has_no_side_effects() {
    let gate = gate_with_cap(100 * MIB);
    gate.ledger()
        .adjust("10.0.0.1", 99 * MIB, AdjustDirection::Add);

    let _ = gate.admit("10.0.0.1", 50 * MIB);
    let _ = gate.admit("10.0.0.1", 50 * MIB);

    // Neither check mutated the ledger
    assert_eq!(gate.ledger().usage("10.0.0.1"), 99 * MIB);
}

#[test]
fn test_acceptance_does_not_mutate_ledger() {
    let gate = gate_with_cap(100 * MIB);

    assert!(gate.admit("10.0.0.1", MIB).is_accepted());
    assert_eq!(gate.ledger().usage("10.0.0.1"), 0);
}

#[test]
fn test_rejection_maps_to_quota_error() {
    let gate = gate_with_cap(MIB);

    let err = gate.admit("10.0.0.1", 2 * MIB).into_result().unwrap_err();
    assert!(matches!(err.kind, QuotaErrorKind::Exceeded { .. }));
}

#[test]
fn test_quota_is_per_address() {
    let gate = gate_with_cap(100 * MIB);
    gate.ledger()
        .adjust("10.0.0.1", 100 * MIB, AdjustDirection::Add);

    assert!(!gate.admit("10.0.0.1", MIB).is_accepted());
    assert!(gate.admit("10.0.0.2", MIB).is_accepted());
}
