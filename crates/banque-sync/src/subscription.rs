//! Subscription handles

use crate::syncer::SyncerInner;
use banque_core::{SessionId, UserStatusSnapshot};
use std::fmt;
use std::sync::{Arc, Weak};

/// Callback invoked with every new snapshot of a session.
pub type SnapshotCallback = Arc<dyn Fn(&UserStatusSnapshot) + Send + Sync>;

/// Registration of one snapshot callback.
///
/// The callback stays registered until [`Subscription::unsubscribe`] is called
/// or the handle is dropped. When the last subscription of a session goes
/// away, the shared remote listener is detached.
#[must_use = "dropping a Subscription unregisters its callback"]
pub struct Subscription {
    syncer: Weak<SyncerInner>,
    session_id: SessionId,
    id: u64,
    released: bool,
}

impl Subscription {
    pub(crate) fn new(syncer: Weak<SyncerInner>, session_id: SessionId, id: u64) -> Self {
        Self {
            syncer,
            session_id,
            id,
            released: false,
        }
    }

    /// Session this subscription observes
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Unregister the callback.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(syncer) = self.syncer.upgrade() {
            syncer.release(self.session_id, self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("session_id", &self.session_id)
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}
