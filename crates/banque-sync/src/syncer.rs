//! Status syncer
//!
//! Keeps one reconciled [`UserStatusSnapshot`] per authenticated session and
//! keeps it current.
//!
//! # Architecture
//!
//! ```text
//!  UserRecordStore ──fetch──► load (shared, one in flight per session) ──┐
//!        │                                                               ▼
//!        └──listen──► listener task (one per session) ──► reconcile ──► SessionSlot
//!                                                                        │ snapshot
//!                                          callbacks ◄── fan-out ────────┘
//! ```
//!
//! Failure policy is stale-while-revalidate: background refreshes and listener
//! errors are logged and the cached snapshot stays in place; only explicit
//! calls (`force_sync`, `submit_verification`, a first load with nothing
//! cached) report remote failures to the caller.
//!
//! Every applied remote state writes its corrective patch back, whether it
//! came from a load or from the listener. Corrections reach a fixpoint, so the
//! echo of a correction produces no further writes. Only `force_sync` reports
//! a failed corrective write; elsewhere it is logged.
//!
//! Remote states are ordered twice: a load only commits if no other commit
//! happened since it started, and a document whose `updatedAt` is older than
//! one already applied is ignored.
//!
//! State lives behind one short `parking_lot` lock that is never held across
//! an `.await`; snapshot replacement is a single swap under that lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use banque_core::record::fields;
use banque_core::{
    AuthProvider, AuthSession, Document, FieldPatch, PhysicalTimeEffects, RecordStream,
    RemoteUserRecord, Result, SessionId, SyncConfig, SyncError, SystemClock, UserRecordStore,
    UserStatusSnapshot, VerificationStatus,
};
use futures::future::{BoxFuture, FutureExt, Shared};
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::reconcile::{reconcile, Reconciliation};
use crate::subscription::{SnapshotCallback, Subscription};

type SharedLoad = Shared<BoxFuture<'static, Result<LoadOutcome>>>;

/// Result of one shared load.
#[derive(Clone)]
struct LoadOutcome {
    /// Snapshot current for the session once the load settled. This is the
    /// loaded one unless a newer state was committed while it was in flight.
    snapshot: UserStatusSnapshot,
    /// Failure of the corrective write, if one was attempted
    correction_error: Option<SyncError>,
}

/// Session-keyed status synchronizer.
///
/// Cheap to clone; clones share the same cache and listeners.
#[derive(Clone)]
pub struct StatusSyncer {
    inner: Arc<SyncerInner>,
}

pub(crate) struct SyncerInner {
    store: Arc<dyn UserRecordStore>,
    auth: Arc<dyn AuthProvider>,
    clock: Arc<dyn PhysicalTimeEffects>,
    config: SyncConfig,
    sessions: Mutex<HashMap<SessionId, SessionSlot>>,
    next_id: AtomicU64,
}

#[derive(Default)]
struct SessionSlot {
    snapshot: Option<UserStatusSnapshot>,
    /// Bumped on every commit; a load only commits if no newer commit happened.
    revision: u64,
    /// Newest remote `updatedAt` applied so far
    applied_updated_at: Option<u64>,
    last_loaded_ms: Option<u64>,
    in_flight: Option<InFlightLoad>,
    listener: Option<SharedListener>,
}

impl SessionSlot {
    fn commit(&mut self, snapshot: UserStatusSnapshot, updated_at: Option<u64>) {
        self.snapshot = Some(snapshot);
        self.revision += 1;
        if updated_at > self.applied_updated_at {
            self.applied_updated_at = updated_at;
        }
    }

    /// Documents without `updatedAt` are always accepted.
    fn accepts(&self, updated_at: Option<u64>) -> bool {
        match (updated_at, self.applied_updated_at) {
            (Some(incoming), Some(applied)) => incoming >= applied,
            _ => true,
        }
    }

    fn is_idle(&self) -> bool {
        self.snapshot.is_none() && self.in_flight.is_none() && self.listener.is_none()
    }
}

struct InFlightLoad {
    ticket: u64,
    load: SharedLoad,
}

struct SharedListener {
    task: JoinHandle<()>,
    callbacks: BTreeMap<u64, SnapshotCallback>,
}

impl StatusSyncer {
    /// Create a syncer over the given collaborators.
    pub fn new(
        store: Arc<dyn UserRecordStore>,
        auth: Arc<dyn AuthProvider>,
        clock: Arc<dyn PhysicalTimeEffects>,
        config: SyncConfig,
    ) -> Self {
        Self {
            inner: Arc::new(SyncerInner {
                store,
                auth,
                clock,
                config,
                sessions: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Create a syncer stamping snapshots with the system clock.
    pub fn with_system_clock(
        store: Arc<dyn UserRecordStore>,
        auth: Arc<dyn AuthProvider>,
        config: SyncConfig,
    ) -> Self {
        Self::new(store, auth, Arc::new(SystemClock), config)
    }

    /// Active configuration
    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    /// Return the cached snapshot and refresh it in the background.
    ///
    /// With nothing cached yet the first load is awaited, and its failure is
    /// returned since there is no previous snapshot to fall back on.
    ///
    /// # Errors
    /// * `SyncError::NotAuthenticated` if no active session matches
    /// * `SyncError::RemoteUnavailable` if the first load fails
    pub async fn get_snapshot(&self, session_id: SessionId) -> Result<UserStatusSnapshot> {
        let session = self.inner.authenticate(session_id)?;

        if let Some(snapshot) = self.inner.cached_snapshot(session_id) {
            if self.inner.background_refresh_due(session_id) {
                self.inner.spawn_background_refresh(session);
            }
            return Ok(snapshot);
        }

        debug!(session = %session_id, "no cached snapshot, loading");
        let outcome = self.inner.load(session).await?;
        Ok(outcome.snapshot)
    }

    /// Re-read the record, write back corrections and return the fresh snapshot.
    ///
    /// Joins a load already in flight for the session instead of issuing a
    /// second read. On failure the cached snapshot is left untouched. If a
    /// newer snapshot was committed while the read was in flight, that one is
    /// kept and returned.
    ///
    /// # Errors
    /// * `SyncError::NotAuthenticated` if no active session matches
    /// * `SyncError::RemoteUnavailable` if the read or the corrective write fails
    pub async fn force_sync(&self, session_id: SessionId) -> Result<UserStatusSnapshot> {
        let session = self.inner.authenticate(session_id)?;

        let outcome = self.inner.load(session).await.map_err(|error| {
            warn!(session = %session_id, %error, "force sync read failed");
            error
        })?;
        match outcome.correction_error {
            Some(error) => Err(error),
            None => Ok(outcome.snapshot),
        }
    }

    /// Register a callback receiving every new snapshot of the session.
    ///
    /// All subscriptions of a session share a single remote listener, attached
    /// on the first subscription and detached when the last one is released.
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// * `SyncError::NotAuthenticated` if no active session matches
    /// * `SyncError::RemoteUnavailable` if the remote listener cannot be attached
    /// * `SyncError::Internal` outside a tokio runtime
    pub fn subscribe<F>(&self, session_id: SessionId, on_change: F) -> Result<Subscription>
    where
        F: Fn(&UserStatusSnapshot) + Send + Sync + 'static,
    {
        let session = self.inner.authenticate(session_id)?;
        let callback: SnapshotCallback = Arc::new(on_change);
        let id = self.inner.next_id();

        let mut sessions = self.inner.sessions.lock();
        if let Some(listener) = sessions
            .get_mut(&session_id)
            .and_then(|slot| slot.listener.as_mut())
        {
            listener.callbacks.insert(id, callback);
            debug!(
                session = %session_id,
                subscribers = listener.callbacks.len(),
                "joined shared listener"
            );
            return Ok(Subscription::new(Arc::downgrade(&self.inner), session_id, id));
        }

        // Attach before touching the session table so a failure leaves no state.
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| SyncError::internal("subscribe requires a tokio runtime"))?;
        let stream = self.inner.store.listen(&session.user_id)?;
        let task = runtime.spawn(run_listener(
            Arc::downgrade(&self.inner),
            session,
            stream,
        ));
        sessions.entry(session_id).or_default().listener = Some(SharedListener {
            task,
            callbacks: BTreeMap::from([(id, callback)]),
        });
        debug!(session = %session_id, "attached remote listener");

        Ok(Subscription::new(Arc::downgrade(&self.inner), session_id, id))
    }

    /// Submit (or resubmit) verification documents.
    ///
    /// Allowed while the status is `unverified` or `rejected`. Moves the record
    /// to `pending`, stamps `updatedAt` and clears any rejection reason.
    ///
    /// # Errors
    /// * `SyncError::NotAuthenticated` if no active session matches
    /// * `SyncError::InvalidTransition` if verification is pending or verified
    /// * `SyncError::RemoteUnavailable` if the record cannot be read or written
    pub async fn submit_verification(&self, session_id: SessionId) -> Result<UserStatusSnapshot> {
        let current = self.force_sync(session_id).await?;
        if !current.status().can_submit() {
            return Err(SyncError::invalid_transition(
                current.status(),
                "submit documents",
            ));
        }
        let session = self.inner.authenticate(session_id)?;
        let base_revision = self.inner.revision(session_id);

        let now = self.inner.clock.physical_time_ms();
        let pending = VerificationStatus::Pending.as_str();
        let mut patch = FieldPatch::new()
            .set(fields::KYC_STATUS, pending)
            .set(fields::VERIFICATION_STATUS, pending)
            .set(fields::UPDATED_AT, now);
        for field in fields::REJECTION_REASONS {
            patch.insert_delete(field);
        }
        self.inner.store.update(&session.user_id, &patch).await?;
        info!(
            session = %session_id,
            user = %session.user_id,
            from = %current.status(),
            "verification submitted"
        );

        let snapshot = UserStatusSnapshot::new(
            VerificationStatus::Pending,
            current.email_verified(),
            now,
            None,
        );
        Ok(self
            .inner
            .commit_if_unchanged(session_id, base_revision, snapshot))
    }

    /// Drop everything held for a session: listener, cache, in-flight load.
    ///
    /// Results of loads still running for the session are discarded.
    pub fn end_session(&self, session_id: SessionId) {
        let slot = self.inner.sessions.lock().remove(&session_id);
        if let Some(slot) = slot {
            if let Some(listener) = slot.listener {
                listener.task.abort();
            }
            info!(session = %session_id, "session state cleared");
        }
    }

    /// Drop every session.
    pub fn clear(&self) {
        let slots: Vec<SessionSlot> = {
            let mut sessions = self.inner.sessions.lock();
            sessions.drain().map(|(_, slot)| slot).collect()
        };
        for listener in slots.into_iter().filter_map(|slot| slot.listener) {
            listener.task.abort();
        }
    }

    /// Cached snapshot without triggering any refresh.
    pub fn cached_snapshot(&self, session_id: SessionId) -> Option<UserStatusSnapshot> {
        self.inner.cached_snapshot(session_id)
    }

    /// Number of sessions with an attached remote listener.
    pub fn listener_count(&self) -> usize {
        self.inner
            .sessions
            .lock()
            .values()
            .filter(|slot| slot.listener.is_some())
            .count()
    }

    /// Number of callbacks registered for a session.
    pub fn subscriber_count(&self, session_id: SessionId) -> usize {
        self.inner
            .sessions
            .lock()
            .get(&session_id)
            .and_then(|slot| slot.listener.as_ref())
            .map_or(0, |listener| listener.callbacks.len())
    }
}

impl SyncerInner {
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn authenticate(&self, session_id: SessionId) -> Result<AuthSession> {
        self.auth.session_matching(session_id).ok_or_else(|| {
            debug!(session = %session_id, "no matching authenticated session");
            SyncError::NotAuthenticated
        })
    }

    /// The provider's current claim, falling back to the one captured at
    /// subscription time once the session is gone.
    fn provider_email_verified(&self, session: &AuthSession) -> bool {
        self.auth
            .session_matching(session.session_id)
            .map_or(session.email_verified, |current| current.email_verified)
    }

    fn cached_snapshot(&self, session_id: SessionId) -> Option<UserStatusSnapshot> {
        self.sessions
            .lock()
            .get(&session_id)
            .and_then(|slot| slot.snapshot.clone())
    }

    fn revision(&self, session_id: SessionId) -> u64 {
        self.sessions
            .lock()
            .get(&session_id)
            .map_or(0, |slot| slot.revision)
    }

    /// Commit a locally built snapshot unless another commit happened since
    /// `base_revision`. Returns the snapshot current afterwards.
    fn commit_if_unchanged(
        &self,
        session_id: SessionId,
        base_revision: u64,
        snapshot: UserStatusSnapshot,
    ) -> UserStatusSnapshot {
        let mut sessions = self.sessions.lock();
        let Some(slot) = sessions.get_mut(&session_id) else {
            return snapshot;
        };
        if slot.revision == base_revision {
            slot.commit(snapshot.clone(), None);
            return snapshot;
        }
        debug!(session = %session_id, "newer snapshot committed meanwhile, keeping it");
        slot.snapshot.clone().unwrap_or(snapshot)
    }

    fn background_refresh_due(&self, session_id: SessionId) -> bool {
        if !self.config.background_refresh {
            return false;
        }
        let now = self.clock.physical_time_ms();
        let sessions = self.sessions.lock();
        match sessions.get(&session_id).and_then(|slot| slot.last_loaded_ms) {
            Some(loaded_at) => now.saturating_sub(loaded_at) >= self.config.refresh_min_interval_ms,
            None => true,
        }
    }

    fn spawn_background_refresh(self: &Arc<Self>, session: AuthSession) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(session = %session.session_id, "no runtime, skipping background refresh");
            return;
        };
        let load = self.load(session.clone());
        runtime.spawn(async move {
            if let Err(error) = load.await {
                warn!(
                    session = %session.session_id,
                    user = %session.user_id,
                    %error,
                    "background refresh failed, keeping cached snapshot"
                );
            }
        });
    }

    /// Start a load for the session, or join the one already in flight.
    fn load(self: &Arc<Self>, session: AuthSession) -> SharedLoad {
        let mut sessions = self.sessions.lock();
        let slot = sessions.entry(session.session_id).or_default();
        if let Some(in_flight) = &slot.in_flight {
            debug!(session = %session.session_id, "joining in-flight load");
            return in_flight.load.clone();
        }

        let ticket = self.next_id();
        let base_revision = slot.revision;
        let syncer = Arc::downgrade(self);
        let load = async move {
            let Some(syncer) = syncer.upgrade() else {
                return Err(SyncError::internal("status syncer dropped during load"));
            };
            let result = match syncer.read_and_reconcile(&session).await {
                Ok(reconciliation) => {
                    Ok(syncer.settle(&session, base_revision, reconciliation).await)
                }
                Err(error) => Err(error),
            };
            syncer.finish_load(&session, ticket);
            result
        }
        .boxed()
        .shared();

        slot.in_flight = Some(InFlightLoad {
            ticket,
            load: load.clone(),
        });
        load
    }

    async fn read_and_reconcile(&self, session: &AuthSession) -> Result<Reconciliation> {
        let document = self.store.fetch(&session.user_id).await?;
        Ok(self.reconcile_document(session, document.as_ref()))
    }

    fn reconcile_document(
        &self,
        session: &AuthSession,
        document: Option<&Document>,
    ) -> Reconciliation {
        let record = RemoteUserRecord::from_optional(document);
        let reconciliation = reconcile(
            &record,
            self.provider_email_verified(session),
            self.clock.physical_time_ms(),
            &self.config,
        );
        reconciliation.log(&session.user_id);
        reconciliation
    }

    /// Commit a loaded reconciliation if it is still the newest state, then
    /// write its corrections back.
    async fn settle(
        &self,
        session: &AuthSession,
        base_revision: u64,
        reconciliation: Reconciliation,
    ) -> LoadOutcome {
        let now = self.clock.physical_time_ms();
        let current = {
            let mut sessions = self.sessions.lock();
            match sessions.get_mut(&session.session_id) {
                None => {
                    debug!(session = %session.session_id, "session ended during load, discarding result");
                    Some(reconciliation.snapshot.clone())
                }
                Some(slot) => {
                    slot.last_loaded_ms = Some(now);
                    if slot.revision == base_revision && slot.accepts(reconciliation.updated_at) {
                        slot.commit(reconciliation.snapshot.clone(), reconciliation.updated_at);
                        None
                    } else {
                        debug!(session = %session.session_id, "newer snapshot committed during load, keeping it");
                        Some(
                            slot.snapshot
                                .clone()
                                .unwrap_or_else(|| reconciliation.snapshot.clone()),
                        )
                    }
                }
            }
        };

        // Corrections of a superseded read were computed from a stale document.
        if let Some(snapshot) = current {
            return LoadOutcome {
                snapshot,
                correction_error: None,
            };
        }
        let correction_error = self
            .write_corrections(session, &reconciliation.corrections)
            .await
            .err();
        LoadOutcome {
            snapshot: reconciliation.snapshot,
            correction_error,
        }
    }

    fn finish_load(&self, session: &AuthSession, ticket: u64) {
        let mut sessions = self.sessions.lock();
        let Some(slot) = sessions.get_mut(&session.session_id) else {
            return;
        };
        if slot
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.ticket == ticket)
        {
            slot.in_flight = None;
        }
        if slot.is_idle() {
            sessions.remove(&session.session_id);
        }
    }

    async fn write_corrections(
        &self,
        session: &AuthSession,
        corrections: &FieldPatch,
    ) -> Result<()> {
        if corrections.is_empty() {
            return Ok(());
        }
        match self.store.update(&session.user_id, corrections).await {
            Ok(()) => {
                info!(
                    session = %session.session_id,
                    user = %session.user_id,
                    fields = corrections.len(),
                    "wrote reconciliation corrections"
                );
                Ok(())
            }
            Err(error) => {
                warn!(
                    session = %session.session_id,
                    user = %session.user_id,
                    %error,
                    "corrective write failed"
                );
                Err(error.into())
            }
        }
    }

    /// Apply a listener document. Returns the corrections to write back, or
    /// `None` when the document was not applied.
    fn apply_remote_change(
        &self,
        session: &AuthSession,
        document: Option<&Document>,
    ) -> Option<FieldPatch> {
        let reconciliation = self.reconcile_document(session, document);
        let now = self.clock.physical_time_ms();

        let callbacks: Vec<SnapshotCallback> = {
            let mut sessions = self.sessions.lock();
            let slot = sessions.get_mut(&session.session_id)?;
            if !slot.accepts(reconciliation.updated_at) {
                debug!(
                    session = %session.session_id,
                    updated_at = ?reconciliation.updated_at,
                    applied = ?slot.applied_updated_at,
                    "ignoring document older than the applied one"
                );
                return None;
            }
            slot.commit(reconciliation.snapshot.clone(), reconciliation.updated_at);
            slot.last_loaded_ms = Some(now);
            slot.listener
                .as_ref()
                .map(|listener| listener.callbacks.values().cloned().collect())
                .unwrap_or_default()
        };

        for callback in callbacks {
            callback(&reconciliation.snapshot);
        }
        Some(reconciliation.corrections)
    }

    pub(crate) fn release(&self, session_id: SessionId, id: u64) {
        let mut sessions = self.sessions.lock();
        let Some(slot) = sessions.get_mut(&session_id) else {
            return;
        };
        let Some(listener) = slot.listener.as_mut() else {
            return;
        };
        if listener.callbacks.remove(&id).is_none() {
            return;
        }
        if listener.callbacks.is_empty() {
            if let Some(listener) = slot.listener.take() {
                listener.task.abort();
            }
            debug!(session = %session_id, "last subscriber left, detached remote listener");
            if slot.is_idle() {
                sessions.remove(&session_id);
            }
        }
    }
}

async fn run_listener(syncer: Weak<SyncerInner>, session: AuthSession, mut stream: RecordStream) {
    while let Some(event) = stream.next().await {
        let Some(syncer) = syncer.upgrade() else {
            break;
        };
        match event {
            Ok(document) => {
                if let Some(corrections) = syncer.apply_remote_change(&session, document.as_ref()) {
                    // Failures are logged; the next remote state retries.
                    let _ = syncer.write_corrections(&session, &corrections).await;
                }
            }
            Err(error) => warn!(
                session = %session.session_id,
                user = %session.user_id,
                %error,
                "realtime listener error, keeping cached snapshot"
            ),
        }
    }
    debug!(session = %session.session_id, "remote listener stream ended");
}
