//! End-to-end status synchronization scenarios against the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use banque_core::record::fields;
use banque_core::{
    resolve_visibility, PatchOp, SessionId, StoreError, SyncConfig, SyncError, VerificationStatus,
    VisibilityFlags,
};
use banque_sync::StatusSyncer;
use banque_testkit::{
    document, eventually, init_test_tracing, ManualClock, MockAuthProvider, MockUserRecordStore,
};
use serde_json::{json, Value};

const USER: &str = "uid-amina";

struct Harness {
    store: MockUserRecordStore,
    auth: MockAuthProvider,
    clock: ManualClock,
    syncer: StatusSyncer,
}

fn harness_with(config: SyncConfig) -> Harness {
    init_test_tracing();
    let store = MockUserRecordStore::new();
    let auth = MockAuthProvider::new();
    let clock = ManualClock::new(1_700_000_000_000);
    let syncer = StatusSyncer::new(
        Arc::new(store.clone()),
        Arc::new(auth.clone()),
        Arc::new(clock.clone()),
        config,
    );
    Harness {
        store,
        auth,
        clock,
        syncer,
    }
}

fn harness() -> Harness {
    harness_with(SyncConfig::default())
}

const RESTRICTED: VisibilityFlags = VisibilityFlags {
    billing: false,
    transfers: false,
    card_limits: true,
    beneficiaries: false,
    documents: true,
    messaging: false,
};

#[tokio::test]
async fn verified_record_unlocks_every_feature() {
    let h = harness();
    h.store.insert_document(
        USER,
        document(json!({ "kycStatus": "verified", "emailVerified": true })),
    );
    let session = h.auth.sign_in(USER, true);

    let snapshot = h.syncer.get_snapshot(session).await.unwrap();
    assert_eq!(snapshot.status(), VerificationStatus::Verified);
    assert!(snapshot.email_verified());

    let flags = resolve_visibility(&snapshot);
    assert!(flags.billing && flags.transfers && flags.messaging);
    assert!(flags.card_limits && flags.documents);
}

#[tokio::test]
async fn verification_status_used_when_kyc_status_missing() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "verificationStatus": "pending" })));
    let session = h.auth.sign_in(USER, false);

    let snapshot = h.syncer.get_snapshot(session).await.unwrap();
    assert_eq!(snapshot.status(), VerificationStatus::Pending);
    assert_eq!(resolve_visibility(&snapshot), RESTRICTED);
}

#[tokio::test]
async fn rejected_snapshot_carries_reason() {
    let h = harness();
    h.store.insert_document(
        USER,
        document(json!({
            "kycStatus": "rejected",
            "rejectionReason": "Document illisible",
            "emailVerified": true,
        })),
    );
    let session = h.auth.sign_in(USER, true);

    let snapshot = h.syncer.get_snapshot(session).await.unwrap();
    assert_eq!(snapshot.status(), VerificationStatus::Rejected);
    assert_eq!(snapshot.rejection_reason(), Some("Document illisible"));
    assert_eq!(resolve_visibility(&snapshot), RESTRICTED);
}

#[tokio::test]
async fn force_sync_writes_provider_email_claim_back() {
    let h = harness();
    h.store.insert_document(
        USER,
        document(json!({ "kycStatus": "pending", "emailVerified": false })),
    );
    let session = h.auth.sign_in(USER, true);

    let snapshot = h.syncer.force_sync(session).await.unwrap();
    assert!(snapshot.email_verified());

    let updates = h.store.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0.as_str(), USER);
    assert_eq!(
        updates[0].1.get(fields::EMAIL_VERIFIED),
        Some(&PatchOp::Set(Value::Bool(true)))
    );
    let stored = h.store.document(USER).unwrap();
    assert_eq!(stored.get("emailVerified"), Some(&Value::Bool(true)));
}

#[tokio::test]
async fn background_failure_keeps_cached_snapshot() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "kycStatus": "verified" })));
    let session = h.auth.sign_in(USER, false);

    let first = h.syncer.get_snapshot(session).await.unwrap();
    h.store
        .set_read_failure(Some(StoreError::unavailable("offline")));

    let second = h.syncer.get_snapshot(session).await.unwrap();
    assert_eq!(second, first);
    assert!(eventually(|| h.store.fetch_calls() == 2).await);

    // Let the failed refresh settle before reading again.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let third = h.syncer.get_snapshot(session).await.unwrap();
    assert_eq!(third, first);
    assert_eq!(h.syncer.cached_snapshot(session), Some(first));
}

#[tokio::test]
async fn calls_without_matching_session_are_rejected() {
    let h = harness();
    let stranger = SessionId::new();
    assert_eq!(
        h.syncer.get_snapshot(stranger).await,
        Err(SyncError::NotAuthenticated)
    );
    assert_eq!(
        h.syncer.force_sync(stranger).await,
        Err(SyncError::NotAuthenticated)
    );
    assert!(matches!(
        h.syncer.subscribe(stranger, |_| {}),
        Err(SyncError::NotAuthenticated)
    ));

    let old = h.auth.sign_in(USER, false);
    h.auth.sign_out();
    let _current = h.auth.sign_in(USER, false);
    assert_eq!(
        h.syncer.get_snapshot(old).await,
        Err(SyncError::NotAuthenticated)
    );
    assert_eq!(h.store.fetch_calls(), 0);
}

#[tokio::test]
async fn missing_document_is_unverified() {
    let h = harness();
    let session = h.auth.sign_in(USER, false);

    let snapshot = h.syncer.get_snapshot(session).await.unwrap();
    assert_eq!(snapshot.status(), VerificationStatus::Unverified);
    assert_eq!(snapshot.rejection_reason(), None);
}

#[tokio::test]
async fn first_load_failure_is_surfaced() {
    let h = harness();
    h.store
        .set_read_failure(Some(StoreError::permission_denied("rules")));
    let session = h.auth.sign_in(USER, false);

    let result = h.syncer.get_snapshot(session).await;
    assert!(matches!(result, Err(SyncError::RemoteUnavailable { .. })));
    assert_eq!(h.syncer.cached_snapshot(session), None);
}

#[tokio::test]
async fn force_sync_failure_is_surfaced_and_cache_kept() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "kycStatus": "pending" })));
    let session = h.auth.sign_in(USER, false);
    let cached = h.syncer.get_snapshot(session).await.unwrap();

    h.store
        .set_read_failure(Some(StoreError::unavailable("timeout")));
    let result = h.syncer.force_sync(session).await;
    assert!(matches!(result, Err(SyncError::RemoteUnavailable { .. })));
    assert_eq!(h.syncer.cached_snapshot(session), Some(cached));
}

#[tokio::test]
async fn failed_corrective_write_is_surfaced() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "emailVerified": false })));
    h.store
        .set_write_failure(Some(StoreError::permission_denied("read-only")));
    let session = h.auth.sign_in(USER, true);

    let result = h.syncer.force_sync(session).await;
    assert!(matches!(result, Err(SyncError::RemoteUnavailable { .. })));
    assert_eq!(h.store.update_calls(), 1);
    assert!(h.store.updates().is_empty());
}

#[tokio::test]
async fn repeated_force_sync_is_idempotent() {
    let h = harness();
    h.store.insert_document(
        USER,
        document(json!({ "kycStatus": "verified", "emailVerified": true })),
    );
    let session = h.auth.sign_in(USER, true);

    let first = h.syncer.force_sync(session).await.unwrap();
    h.clock.advance(5_000);
    let second = h.syncer.force_sync(session).await.unwrap();

    assert!(first.equivalent(&second));
    assert_eq!(second.last_updated(), first.last_updated() + 5_000);
    assert_eq!(h.store.update_calls(), 0);
}

#[tokio::test]
async fn correction_is_written_once() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "emailVerified": false })));
    let session = h.auth.sign_in(USER, true);

    let first = h.syncer.force_sync(session).await.unwrap();
    let second = h.syncer.force_sync(session).await.unwrap();
    assert!(first.equivalent(&second));
    assert_eq!(h.store.update_calls(), 1);
}

#[tokio::test]
async fn concurrent_force_syncs_share_one_read() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "kycStatus": "verified" })));
    let session = h.auth.sign_in(USER, false);

    h.store.pause_reads();
    let store = h.store.clone();
    let (a, b, ()) = tokio::join!(
        h.syncer.force_sync(session),
        h.syncer.force_sync(session),
        async move {
            tokio::task::yield_now().await;
            store.resume_reads();
        }
    );

    assert_eq!(a.unwrap().status(), VerificationStatus::Verified);
    assert_eq!(b.unwrap().status(), VerificationStatus::Verified);
    assert_eq!(h.store.fetch_calls(), 1);
}

#[tokio::test]
async fn subscribers_share_one_remote_listener() {
    let h = harness();
    h.store.insert_document(
        USER,
        document(json!({ "kycStatus": "pending", "emailVerified": true })),
    );
    let session = h.auth.sign_in(USER, true);

    let seen: Vec<Arc<Mutex<Vec<VerificationStatus>>>> =
        (0..5).map(|_| Arc::new(Mutex::new(Vec::new()))).collect();
    let subscriptions: Vec<_> = seen
        .iter()
        .map(|log| {
            let log = Arc::clone(log);
            h.syncer
                .subscribe(session, move |snapshot| {
                    log.lock().unwrap().push(snapshot.status());
                })
                .unwrap()
        })
        .collect();

    assert_eq!(h.store.listen_calls(), 1);
    assert_eq!(h.syncer.listener_count(), 1);
    assert_eq!(h.syncer.subscriber_count(session), 5);

    assert!(eventually(|| seen.iter().all(|log| log.lock().unwrap().len() == 1)).await);

    h.store.push_document(
        USER,
        document(json!({ "kycStatus": "verified", "emailVerified": true })),
    );
    assert!(eventually(|| seen.iter().all(|log| log.lock().unwrap().len() == 2)).await);

    for log in &seen {
        assert_eq!(
            *log.lock().unwrap(),
            vec![VerificationStatus::Pending, VerificationStatus::Verified]
        );
    }
    assert_eq!(h.store.listen_calls(), 1);
    drop(subscriptions);
}

#[tokio::test]
async fn listener_detached_only_after_last_unsubscribe() {
    let h = harness();
    let session = h.auth.sign_in(USER, false);

    let first = h.syncer.subscribe(session, |_| {}).unwrap();
    let second = h.syncer.subscribe(session, |_| {}).unwrap();
    assert_eq!(h.store.active_listeners(USER), 1);

    first.unsubscribe();
    assert_eq!(h.syncer.listener_count(), 1);
    assert_eq!(h.syncer.subscriber_count(session), 1);
    assert_eq!(h.store.active_listeners(USER), 1);

    drop(second);
    assert_eq!(h.syncer.listener_count(), 0);
    assert!(eventually(|| h.store.active_listeners(USER) == 0).await);

    let _third = h.syncer.subscribe(session, |_| {}).unwrap();
    assert_eq!(h.store.listen_calls(), 2);
}

#[tokio::test]
async fn remote_changes_refresh_the_cache() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "kycStatus": "pending" })));
    let session = h.auth.sign_in(USER, false);
    let _subscription = h.syncer.subscribe(session, |_| {}).unwrap();

    h.store.push_document(
        USER,
        document(json!({ "kycStatus": "rejected", "rejectionReason": "Selfie floue" })),
    );
    assert!(
        eventually(|| h
            .syncer
            .cached_snapshot(session)
            .is_some_and(|s| s.status() == VerificationStatus::Rejected))
        .await
    );
    let cached = h.syncer.cached_snapshot(session).unwrap();
    assert_eq!(cached.rejection_reason(), Some("Selfie floue"));
}

#[tokio::test]
async fn listener_errors_keep_the_cache() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "kycStatus": "verified" })));
    let session = h.auth.sign_in(USER, false);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let _subscription = h
        .syncer
        .subscribe(session, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    assert!(eventually(|| calls.load(Ordering::SeqCst) == 1).await);

    h.store
        .push_error(USER, StoreError::permission_denied("token expired"));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        h.syncer.cached_snapshot(session).map(|s| s.status()),
        Some(VerificationStatus::Verified)
    );
    assert_eq!(h.syncer.listener_count(), 1);
}

#[tokio::test]
async fn listen_failure_is_surfaced() {
    let h = harness();
    h.store
        .set_listen_failure(Some(StoreError::unavailable("offline")));
    let session = h.auth.sign_in(USER, false);

    let result = h.syncer.subscribe(session, |_| {});
    assert!(matches!(result, Err(SyncError::RemoteUnavailable { .. })));
    assert_eq!(h.syncer.listener_count(), 0);
    assert_eq!(h.syncer.subscriber_count(session), 0);

    h.store.set_listen_failure(None);
    let _subscription = h.syncer.subscribe(session, |_| {}).unwrap();
    assert_eq!(h.syncer.listener_count(), 1);
    assert_eq!(h.store.listen_calls(), 2);
}

#[tokio::test]
async fn end_session_tears_everything_down() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "kycStatus": "verified" })));
    let session = h.auth.sign_in(USER, false);
    h.syncer.get_snapshot(session).await.unwrap();
    let subscription = h.syncer.subscribe(session, |_| {}).unwrap();

    h.syncer.end_session(session);
    h.auth.sign_out();

    assert_eq!(h.syncer.listener_count(), 0);
    assert_eq!(h.syncer.cached_snapshot(session), None);
    assert!(eventually(|| h.store.active_listeners(USER) == 0).await);

    // Releasing a handle after teardown is harmless.
    drop(subscription);
    assert_eq!(
        h.syncer.get_snapshot(session).await,
        Err(SyncError::NotAuthenticated)
    );
}

#[tokio::test]
async fn clear_drops_every_session() {
    let h = harness();
    let session = h.auth.sign_in(USER, false);
    h.syncer.get_snapshot(session).await.unwrap();
    let _subscription = h.syncer.subscribe(session, |_| {}).unwrap();

    h.syncer.clear();
    assert_eq!(h.syncer.listener_count(), 0);
    assert_eq!(h.syncer.cached_snapshot(session), None);
}

#[tokio::test]
async fn resubmission_clears_rejection_reason() {
    let h = harness();
    h.store.insert_document(
        USER,
        document(json!({
            "kycStatus": "rejected",
            "verificationStatus": "rejected",
            "rejectionReason": "Document illisible",
            "emailVerified": true,
        })),
    );
    let session = h.auth.sign_in(USER, true);

    let snapshot = h.syncer.submit_verification(session).await.unwrap();
    assert_eq!(snapshot.status(), VerificationStatus::Pending);
    assert_eq!(snapshot.rejection_reason(), None);
    assert_eq!(h.syncer.cached_snapshot(session), Some(snapshot));

    let stored = h.store.document(USER).unwrap();
    assert_eq!(stored.get("kycStatus"), Some(&Value::from("pending")));
    assert_eq!(stored.get("verificationStatus"), Some(&Value::from("pending")));
    assert_eq!(stored.get("rejectionReason"), None);
}

#[tokio::test]
async fn submission_refused_once_under_review() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "kycStatus": "pending" })));
    let session = h.auth.sign_in(USER, false);

    let result = h.syncer.submit_verification(session).await;
    assert_eq!(
        result,
        Err(SyncError::invalid_transition(
            VerificationStatus::Pending,
            "submit documents"
        ))
    );
    assert_eq!(h.store.update_calls(), 0);
}

#[tokio::test]
async fn stale_load_does_not_overwrite_newer_listener_snapshot() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "kycStatus": "pending" })));
    let session = h.auth.sign_in(USER, false);
    let _subscription = h.syncer.subscribe(session, |_| {}).unwrap();
    assert!(eventually(|| h.syncer.cached_snapshot(session).is_some()).await);

    // Cached value served; the background refresh blocks on the paused read.
    h.store.pause_reads();
    h.syncer.get_snapshot(session).await.unwrap();
    assert!(eventually(|| h.store.fetch_calls() == 1).await);

    h.store
        .push_document(USER, document(json!({ "kycStatus": "verified" })));
    assert!(
        eventually(|| h
            .syncer
            .cached_snapshot(session)
            .is_some_and(|s| s.status() == VerificationStatus::Verified))
        .await
    );

    // The paused read now observes an older state than the listener delivered.
    h.store
        .insert_document(USER, document(json!({ "kycStatus": "pending" })));
    h.store.resume_reads();
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(
        h.syncer.cached_snapshot(session).map(|s| s.status()),
        Some(VerificationStatus::Verified)
    );
}

#[tokio::test]
async fn stale_force_sync_does_not_overwrite_newer_listener_snapshot() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "kycStatus": "pending" })));
    let session = h.auth.sign_in(USER, false);
    let _subscription = h.syncer.subscribe(session, |_| {}).unwrap();
    assert!(eventually(|| h.syncer.cached_snapshot(session).is_some()).await);

    h.store.pause_reads();
    let syncer = h.syncer.clone();
    let sync = tokio::spawn(async move { syncer.force_sync(session).await });
    assert!(eventually(|| h.store.fetch_calls() == 1).await);

    h.store
        .push_document(USER, document(json!({ "kycStatus": "verified" })));
    assert!(
        eventually(|| h
            .syncer
            .cached_snapshot(session)
            .is_some_and(|s| s.status() == VerificationStatus::Verified))
        .await
    );

    h.store
        .insert_document(USER, document(json!({ "kycStatus": "pending" })));
    h.store.resume_reads();

    let returned = sync.await.unwrap().unwrap();
    assert_eq!(returned.status(), VerificationStatus::Verified);
    assert_eq!(
        h.syncer.cached_snapshot(session).map(|s| s.status()),
        Some(VerificationStatus::Verified)
    );
    assert_eq!(h.store.update_calls(), 0);
}

#[tokio::test]
async fn older_update_time_is_ignored() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "kycStatus": "pending" })));
    let session = h.auth.sign_in(USER, false);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let _subscription = h
        .syncer
        .subscribe(session, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    assert!(eventually(|| calls.load(Ordering::SeqCst) == 1).await);

    h.store.push_document(
        USER,
        document(json!({ "kycStatus": "verified", "updatedAt": 2_000 })),
    );
    assert!(eventually(|| calls.load(Ordering::SeqCst) == 2).await);

    // Delivered late by the listener
    h.store.push_document(
        USER,
        document(json!({ "kycStatus": "pending", "updatedAt": 1_000 })),
    );
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        h.syncer.cached_snapshot(session).map(|s| s.status()),
        Some(VerificationStatus::Verified)
    );

    // Read back from the store by a load
    let synced = h.syncer.force_sync(session).await.unwrap();
    assert_eq!(synced.status(), VerificationStatus::Verified);

    h.store.push_document(
        USER,
        document(json!({
            "kycStatus": "rejected",
            "updatedAt": { "seconds": 3, "nanoseconds": 0 },
        })),
    );
    assert!(eventually(|| calls.load(Ordering::SeqCst) == 3).await);
    assert_eq!(
        h.syncer.cached_snapshot(session).map(|s| s.status()),
        Some(VerificationStatus::Rejected)
    );
}

#[tokio::test]
async fn first_load_writes_provider_email_claim_back() {
    let h = harness();
    h.store.insert_document(
        USER,
        document(json!({ "kycStatus": "pending", "emailVerified": false })),
    );
    let session = h.auth.sign_in(USER, true);

    let snapshot = h.syncer.get_snapshot(session).await.unwrap();
    assert!(snapshot.email_verified());
    assert_eq!(h.store.update_calls(), 1);
    let stored = h.store.document(USER).unwrap();
    assert_eq!(stored.get("emailVerified"), Some(&Value::Bool(true)));

    // The corrected record needs nothing more.
    let _subscription = h.syncer.subscribe(session, |_| {}).unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(h.store.update_calls(), 1);
}

#[tokio::test]
async fn listener_writes_provider_email_claim_back_once() {
    let h = harness();
    h.store.insert_document(
        USER,
        document(json!({ "kycStatus": "verified", "isEmailVerified": false })),
    );
    let session = h.auth.sign_in(USER, true);
    let _subscription = h.syncer.subscribe(session, |_| {}).unwrap();

    assert!(
        eventually(|| h
            .store
            .document(USER)
            .is_some_and(|doc| doc.get("isEmailVerified") == Some(&Value::Bool(true))))
        .await
    );
    // The echo of the correction is consistent and triggers no second write.
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(h.store.update_calls(), 1);
    let stored = h.store.document(USER).unwrap();
    assert_eq!(stored.get("emailVerified"), Some(&Value::Bool(true)));
}

#[tokio::test]
async fn background_corrective_write_failure_is_not_surfaced() {
    let h = harness();
    h.store
        .insert_document(USER, document(json!({ "emailVerified": false })));
    h.store
        .set_write_failure(Some(StoreError::permission_denied("read-only")));
    let session = h.auth.sign_in(USER, true);

    let snapshot = h.syncer.get_snapshot(session).await.unwrap();
    assert!(snapshot.email_verified());
    assert_eq!(h.store.update_calls(), 1);
    assert_eq!(h.syncer.cached_snapshot(session), Some(snapshot));
}

#[tokio::test]
async fn background_refresh_respects_min_interval() {
    let h = harness_with(SyncConfig {
        refresh_min_interval_ms: 60_000,
        ..SyncConfig::default()
    });
    let session = h.auth.sign_in(USER, false);

    h.syncer.get_snapshot(session).await.unwrap();
    h.syncer.get_snapshot(session).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(h.store.fetch_calls(), 1);

    h.clock.advance(60_000);
    h.syncer.get_snapshot(session).await.unwrap();
    assert!(eventually(|| h.store.fetch_calls() == 2).await);
}

#[tokio::test]
async fn background_refresh_can_be_disabled() {
    let h = harness_with(SyncConfig {
        background_refresh: false,
        ..SyncConfig::default()
    });
    let session = h.auth.sign_in(USER, false);

    for _ in 0..3 {
        h.syncer.get_snapshot(session).await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(h.store.fetch_calls(), 1);
}

#[tokio::test]
async fn legacy_status_normalized_on_force_sync_when_enabled() {
    let h = harness_with(SyncConfig {
        normalize_legacy_status: true,
        ..SyncConfig::default()
    });
    h.store.insert_document(
        USER,
        document(json!({
            "kycStatus": "verified",
            "verificationStatus": "pending",
            "status": "in_review",
        })),
    );
    let session = h.auth.sign_in(USER, false);

    h.syncer.force_sync(session).await.unwrap();
    let stored = h.store.document(USER).unwrap();
    assert_eq!(stored.get("verificationStatus"), Some(&Value::from("verified")));
    assert_eq!(stored.get("status"), Some(&Value::from("verified")));
}
