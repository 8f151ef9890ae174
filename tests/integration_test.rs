use notary_core::{
    AbortKind, Address, AuditTrail, Clock, LockMode, LockingConfig, Notarization,
    NotarizationMetadata, NotarizationState, PermissionKind, Role, Timelock, Timestamp,
    TrailMetadata, TxContext,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn alice() -> Address {
    Address::new([1; 32])
}

fn clock(secs: u64) -> Clock {
    Clock::from_secs(secs)
}

#[test]
fn record_chain_stays_dense_across_appends() {
    let mut ctx = TxContext::new(alice(), 0);
    let (mut trail, cap) = AuditTrail::create(
        LockingConfig::deny_all(),
        TrailMetadata::new(Some("dense"), None::<String>),
        &clock(0),
        &mut ctx,
    );

    let mut ids = Vec::new();
    for n in 0..10u64 {
        let id = trail
            .append(&cap, format!("entry {}", n), None, &clock(n), &mut ctx)
            .unwrap();
        ids.push(id);
    }

    assert_eq!(trail.record_count(), 10);
    for (expected, id) in ids.iter().enumerate() {
        assert_eq!(trail.record(*id).unwrap().sequence_number(), expected as u64);
    }

    // Newest-to-first walk covers every record exactly once.
    let walked: Vec<u64> = trail.walk_chain().map(|r| r.sequence_number()).collect();
    assert_eq!(walked, (0..10u64).rev().collect::<Vec<_>>());
    assert!(trail.walk_chain().last().unwrap().previous_record_id().is_none());
}

#[test]
fn hour_long_time_window_gates_deletion() {
    init_tracing();
    let mut ctx = TxContext::new(alice(), 0);
    let (mut trail, cap) = AuditTrail::create(
        LockingConfig::new(Some(3_600), None),
        TrailMetadata::new(Some("retention"), None::<String>),
        &clock(0),
        &mut ctx,
    );
    let record = trail
        .append(&cap, "audit entry".to_string(), None, &clock(0), &mut ctx)
        .unwrap();

    // One second short of the window: locked.
    let err = trail.delete(&cap, record, &clock(3_599)).unwrap_err();
    assert_eq!(err.kind, AbortKind::LockedRecord);
    assert_eq!(err.code(), 4);
    assert!(trail.record(record).is_some());

    // Exactly at the window: eligible.
    trail.delete(&cap, record, &clock(3_600)).unwrap();
    assert!(trail.record(record).is_none());
    assert_eq!(trail.record_count(), 1);
}

#[test]
fn unconfigured_policy_locks_records_forever() {
    let mut ctx = TxContext::new(alice(), 0);
    let (mut trail, cap) = AuditTrail::create(
        LockingConfig::deny_all(),
        TrailMetadata::default(),
        &clock(0),
        &mut ctx,
    );
    let record = trail
        .append(&cap, "permanent".to_string(), None, &clock(0), &mut ctx)
        .unwrap();

    for probe in [0, 1, 3_600, 86_400, u64::MAX] {
        let err = trail.delete(&cap, record, &clock(probe)).unwrap_err();
        assert_eq!(err.kind, AbortKind::LockedRecord);
    }
}

#[test]
fn both_windows_must_elapse_before_deletion() {
    let mut ctx = TxContext::new(alice(), 0);
    let (mut trail, cap) = AuditTrail::create(
        LockingConfig::new(Some(100), Some(3)),
        TrailMetadata::default(),
        &clock(0),
        &mut ctx,
    );
    let first = trail
        .append(&cap, "first".to_string(), None, &clock(0), &mut ctx)
        .unwrap();

    // Time window satisfied, count window not.
    let err = trail.delete(&cap, first, &clock(500)).unwrap_err();
    assert_eq!(err.kind, AbortKind::LockedRecord);

    trail
        .append(&cap, "second".to_string(), None, &clock(500), &mut ctx)
        .unwrap();
    trail
        .append(&cap, "third".to_string(), None, &clock(500), &mut ctx)
        .unwrap();

    // Count window satisfied (3 - 0 >= 3), time satisfied long ago.
    trail.delete(&cap, first, &clock(500)).unwrap();
}

#[test]
fn capability_lifecycle_grant_use_revoke() {
    init_tracing();
    let mut ctx = TxContext::new(alice(), 0);
    let (mut trail, admin) = AuditTrail::create(
        LockingConfig::deny_all(),
        TrailMetadata::new(Some("caps"), None::<String>),
        &clock(0),
        &mut ctx,
    );

    let auditor = trail
        .grant(
            &admin,
            Role::new("auditor"),
            &[PermissionKind::Append, PermissionKind::UpdateMetadata],
            &mut ctx,
        )
        .unwrap();
    assert_eq!(auditor.role().as_str(), "auditor");
    assert!(trail.capability_issued(auditor.id()));

    trail
        .append(&auditor, "logged".to_string(), None, &clock(1), &mut ctx)
        .unwrap();
    trail
        .update_metadata(&auditor, Some("quarterly".to_string()))
        .unwrap();

    // The auditor role was never granted delete.
    let head = trail.head().unwrap();
    let err = trail.delete(&auditor, head, &clock(2)).unwrap_err();
    assert_eq!(
        err.kind,
        AbortKind::PermissionDenied {
            required: PermissionKind::Delete
        }
    );

    // Revocation is permanent.
    trail.revoke(&admin, auditor.id()).unwrap();
    let err = trail
        .append(&auditor, "stale".to_string(), None, &clock(3), &mut ctx)
        .unwrap_err();
    assert_eq!(err.kind, AbortKind::CapabilityRevoked);
    assert_eq!(err.code(), 3);
    assert_eq!(trail.record_count(), 1);
}

#[test]
fn append_without_permission_fails_and_changes_nothing() {
    let mut ctx = TxContext::new(alice(), 0);
    let (mut trail, admin) = AuditTrail::create(
        LockingConfig::deny_all(),
        TrailMetadata::default(),
        &clock(0),
        &mut ctx,
    );
    let observer = trail
        .grant(&admin, Role::new("observer"), &[], &mut ctx)
        .unwrap();

    let err = trail
        .append(&observer, "denied".to_string(), None, &clock(1), &mut ctx)
        .unwrap_err();
    assert_eq!(
        err.kind,
        AbortKind::PermissionDenied {
            required: PermissionKind::Append
        }
    );
    assert_eq!(trail.record_count(), 0);
    assert!(trail.head().is_none());
    assert!(trail.walk_chain().next().is_none());
}

#[test]
fn chain_walk_tolerates_deletion_gaps() {
    let mut ctx = TxContext::new(alice(), 0);
    let (mut trail, cap) = AuditTrail::create(
        LockingConfig::new(Some(0), None),
        TrailMetadata::default(),
        &clock(0),
        &mut ctx,
    );

    let mut ids = Vec::new();
    for n in 0..5u64 {
        ids.push(
            trail
                .append(&cap, format!("r{}", n), None, &clock(0), &mut ctx)
                .unwrap(),
        );
    }

    // Delete the middle record; the chain now has a gap at sequence 2.
    trail.delete(&cap, ids[2], &clock(1)).unwrap();

    let walked: Vec<u64> = trail.walk_chain().map(|r| r.sequence_number()).collect();
    assert_eq!(walked, vec![4, 3]);

    // Surviving records before the gap are still individually readable.
    assert_eq!(trail.record(ids[1]).unwrap().sequence_number(), 1);
    assert_eq!(trail.record(ids[0]).unwrap().sequence_number(), 0);
}

#[test]
fn dynamic_notarization_updates_twice_then_destroys() {
    init_tracing();
    let mut ctx = TxContext::new(alice(), 0);
    let clk = clock(100);
    let mut notarization = Notarization::create(
        NotarizationState::new("state-0".to_string(), None::<String>),
        NotarizationMetadata::new(Some("agreement"), Some("notarized payload")),
        None,
        Timelock::None,
        LockMode::Dynamic,
        &clk,
        &mut ctx,
    );
    let initial = notarization.version();

    notarization
        .update_state(
            NotarizationState::new("state-1".to_string(), None::<String>),
            &clk,
            &ctx,
        )
        .unwrap();
    notarization
        .update_state(
            NotarizationState::new("state-2".to_string(), None::<String>),
            &clk,
            &ctx,
        )
        .unwrap();

    assert_eq!(notarization.version(), initial + 2);
    assert_eq!(notarization.immutable_metadata().name(), Some("agreement"));

    // Destroy succeeds at any time for dynamic objects.
    let payload = notarization.destroy(&clock(0), &ctx).unwrap();
    assert_eq!(payload, "state-2");
}

#[test]
fn locked_notarization_is_immutable_and_timelocked() {
    let mut ctx = TxContext::new(alice(), 0);
    let mut notarization = Notarization::create(
        NotarizationState::new(vec![0xde, 0xad], None::<String>),
        NotarizationMetadata::new(Some("sealed"), None::<String>),
        None,
        Timelock::UntilTimestamp(Timestamp::from_secs(100)),
        LockMode::Locked,
        &clock(0),
        &mut ctx,
    );

    let err = notarization
        .update_state(NotarizationState::new(vec![0xbe, 0xef], None::<String>), &clock(150), &ctx)
        .unwrap_err();
    assert_eq!(err.kind, AbortKind::LockedNotarization);

    let err = notarization.transfer(Address::new([2; 32]), &ctx).unwrap_err();
    assert_eq!(err.kind, AbortKind::TransferNotAllowed);
    assert_eq!(err.code(), 7);

    // Destroy at t=50: timelock still active.
    let (abort, notarization) = notarization.destroy(&clock(50), &ctx).unwrap_err();
    assert_eq!(abort.kind, AbortKind::TimelockActive);

    // Destroy at t=100: timelock expired.
    let payload = notarization.destroy(&clock(100), &ctx).unwrap();
    assert_eq!(payload, vec![0xde, 0xad]);
}

#[test]
fn transferred_notarization_obeys_its_new_owner() {
    let bob = Address::new([2; 32]);
    let mut ctx = TxContext::new(alice(), 0);
    let mut notarization = Notarization::create(
        NotarizationState::new(7u64, None::<String>),
        NotarizationMetadata::default(),
        None,
        Timelock::None,
        LockMode::Dynamic,
        &clock(0),
        &mut ctx,
    );

    notarization.transfer(bob, &ctx).unwrap();

    let bob_ctx = TxContext::new(bob, 50);
    notarization
        .update_state(NotarizationState::new(8u64, None::<String>), &clock(1), &bob_ctx)
        .unwrap();
    assert_eq!(*notarization.state().data(), 8);

    let (abort, _kept) = notarization.destroy(&clock(2), &ctx).unwrap_err();
    assert_eq!(abort.kind, AbortKind::NotAuthorized);
}

#[test]
fn structured_payloads_work_end_to_end() {
    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Deployment {
        service: String,
        digest: [u8; 4],
    }

    let mut ctx = TxContext::new(alice(), 0);
    let (mut trail, cap) = AuditTrail::create(
        LockingConfig::deny_all(),
        TrailMetadata::new(Some("deploys"), None::<String>),
        &clock(0),
        &mut ctx,
    );

    let id = trail
        .append(
            &cap,
            Deployment {
                service: "gateway".to_string(),
                digest: [1, 2, 3, 4],
            },
            Some("canary".to_string()),
            &clock(60),
            &mut ctx,
        )
        .unwrap();

    let record = trail.record(id).unwrap();
    assert_eq!(record.data().service, "gateway");
    assert_eq!(record.metadata(), Some("canary"));

    // The persisted layout keeps field names and values.
    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["stored_data"]["service"], "gateway");
    assert_eq!(json["sequence_number"], 0);
}
