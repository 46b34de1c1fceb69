//! In-memory user record store
//!
//! Behaves like the hosted document store for the parts the status slice
//! uses: listeners receive the current document on attach and the full
//! document after every write. Call counters, failure injection and a read
//! gate let tests observe de-duplication and failure handling.

use async_trait::async_trait;
use banque_core::{Document, FieldPatch, RecordStream, StoreError, UserId, UserRecordStore};
use futures::channel::mpsc;
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

type ListenerSender = mpsc::UnboundedSender<Result<Option<Document>, StoreError>>;

#[derive(Default)]
struct StoreState {
    documents: HashMap<UserId, Document>,
    listeners: Vec<(UserId, ListenerSender)>,
    updates: Vec<(UserId, FieldPatch)>,
    fetch_calls: usize,
    update_calls: usize,
    listen_calls: usize,
    read_failure: Option<StoreError>,
    write_failure: Option<StoreError>,
    listen_failure: Option<StoreError>,
}

impl StoreState {
    fn notify(&mut self, user_id: &UserId, event: Result<Option<Document>, StoreError>) {
        self.listeners.retain(|(_, sender)| !sender.is_closed());
        for (listener_user, sender) in &self.listeners {
            if listener_user == user_id {
                let _ = sender.unbounded_send(event.clone());
            }
        }
    }
}

/// Shared in-memory document store. Clones share state.
#[derive(Clone)]
pub struct MockUserRecordStore {
    state: Arc<Mutex<StoreState>>,
    reads_paused: Arc<watch::Sender<bool>>,
}

impl Default for MockUserRecordStore {
    fn default() -> Self {
        let (reads_paused, _) = watch::channel(false);
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            reads_paused: Arc::new(reads_paused),
        }
    }
}

impl MockUserRecordStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MockUserRecordStore::insert_document`]
    pub fn with_document(self, user_id: impl Into<UserId>, document: Document) -> Self {
        self.insert_document(user_id, document);
        self
    }

    /// Replace a document without notifying listeners.
    pub fn insert_document(&self, user_id: impl Into<UserId>, document: Document) {
        self.state.lock().documents.insert(user_id.into(), document);
    }

    /// Replace a document and notify listeners, like a remote admin edit.
    pub fn push_document(&self, user_id: impl Into<UserId>, document: Document) {
        let user_id = user_id.into();
        let mut state = self.state.lock();
        state.documents.insert(user_id.clone(), document.clone());
        state.notify(&user_id, Ok(Some(document)));
    }

    /// Deliver a listener error to every listener of the user.
    pub fn push_error(&self, user_id: impl Into<UserId>, error: StoreError) {
        self.state.lock().notify(&user_id.into(), Err(error));
    }

    /// Current stored document
    pub fn document(&self, user_id: impl Into<UserId>) -> Option<Document> {
        self.state.lock().documents.get(&user_id.into()).cloned()
    }

    /// Make every subsequent `fetch` fail (or succeed again with `None`).
    pub fn set_read_failure(&self, failure: Option<StoreError>) {
        self.state.lock().read_failure = failure;
    }

    /// Make every subsequent `update` fail (or succeed again with `None`).
    pub fn set_write_failure(&self, failure: Option<StoreError>) {
        self.state.lock().write_failure = failure;
    }

    /// Make every subsequent `listen` fail (or succeed again with `None`).
    pub fn set_listen_failure(&self, failure: Option<StoreError>) {
        self.state.lock().listen_failure = failure;
    }

    /// Hold every `fetch` until [`MockUserRecordStore::resume_reads`].
    pub fn pause_reads(&self) {
        self.reads_paused.send_replace(true);
    }

    /// Release held and future `fetch` calls.
    pub fn resume_reads(&self) {
        self.reads_paused.send_replace(false);
    }

    /// Number of `fetch` calls so far
    pub fn fetch_calls(&self) -> usize {
        self.state.lock().fetch_calls
    }

    /// Number of `update` calls so far
    pub fn update_calls(&self) -> usize {
        self.state.lock().update_calls
    }

    /// Number of `listen` calls so far
    pub fn listen_calls(&self) -> usize {
        self.state.lock().listen_calls
    }

    /// Successful updates, in order
    pub fn updates(&self) -> Vec<(UserId, FieldPatch)> {
        self.state.lock().updates.clone()
    }

    /// Listeners of a user whose stream has not been dropped
    pub fn active_listeners(&self, user_id: impl Into<UserId>) -> usize {
        let user_id = user_id.into();
        self.state
            .lock()
            .listeners
            .iter()
            .filter(|(listener_user, sender)| *listener_user == user_id && !sender.is_closed())
            .count()
    }
}

#[async_trait]
impl UserRecordStore for MockUserRecordStore {
    async fn fetch(&self, user_id: &UserId) -> Result<Option<Document>, StoreError> {
        self.state.lock().fetch_calls += 1;

        let mut paused = self.reads_paused.subscribe();
        let _ = paused.wait_for(|paused| !*paused).await;

        let state = self.state.lock();
        if let Some(failure) = &state.read_failure {
            return Err(failure.clone());
        }
        Ok(state.documents.get(user_id).cloned())
    }

    async fn update(&self, user_id: &UserId, patch: &FieldPatch) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.update_calls += 1;
        if let Some(failure) = &state.write_failure {
            return Err(failure.clone());
        }
        let document = state.documents.entry(user_id.clone()).or_default();
        patch.apply_to(document);
        let document = document.clone();
        state.updates.push((user_id.clone(), patch.clone()));
        state.notify(user_id, Ok(Some(document)));
        Ok(())
    }

    fn listen(&self, user_id: &UserId) -> Result<RecordStream, StoreError> {
        let mut state = self.state.lock();
        state.listen_calls += 1;
        if let Some(failure) = &state.listen_failure {
            return Err(failure.clone());
        }
        let (sender, receiver) = mpsc::unbounded();
        let _ = sender.unbounded_send(Ok(state.documents.get(user_id).cloned()));
        state.listeners.push((user_id.clone(), sender));
        Ok(receiver.boxed())
    }
}
