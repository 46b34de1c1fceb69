//! # Session Context
//!
//! One [`SessionContext`] per signed-in user, created at sign-in and consumed
//! by [`SessionContext::sign_out`]. It keeps the last [`StatusView`] current
//! through a live subscription, so presentation code reads it synchronously.

use std::sync::Arc;

use banque_core::{
    resolve_visibility, AuthProvider, SessionId, UserId, UserStatusSnapshot, VisibilityFlags,
};
use banque_sync::{StatusSyncer, Subscription};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::{AppError, ToastLevel};
use crate::guards::{
    banners_for, gate_action, guard_route, menu_entries, Banner, GateOutcome, GatedAction,
    MenuEntry, Route, RouteDecision,
};

/// Everything a page needs to render status-dependent UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    /// Reconciled status
    pub snapshot: UserStatusSnapshot,
    /// Derived feature visibility
    pub flags: VisibilityFlags,
    /// Banners to display, most important first
    pub banners: Vec<Banner>,
}

impl StatusView {
    /// Derive the view of a snapshot.
    pub fn from_snapshot(snapshot: UserStatusSnapshot) -> Self {
        let flags = resolve_visibility(&snapshot);
        let banners = banners_for(&snapshot);
        Self {
            snapshot,
            flags,
            banners,
        }
    }
}

/// Transient notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// Severity
    pub level: ToastLevel,
    /// Error code, for telemetry and tests
    pub code: &'static str,
    /// Display text
    pub message: String,
}

impl From<&AppError> for Toast {
    fn from(err: &AppError) -> Self {
        Self {
            level: err.toast_level(),
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Result of an explicit sync request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceSyncOutcome {
    /// Fresh view on success, last known view on failure
    pub view: StatusView,
    /// Failure notification; `None` on success
    pub toast: Option<Toast>,
}

/// Status state scoped to one authenticated session.
pub struct SessionContext {
    syncer: StatusSyncer,
    auth: Arc<dyn AuthProvider>,
    session_id: SessionId,
    user_id: UserId,
    view: Arc<RwLock<StatusView>>,
    live: Subscription,
}

impl SessionContext {
    /// Build the context for the currently signed-in user.
    ///
    /// Loads the initial view and attaches a live subscription that keeps it
    /// current. Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// * `AppError::SignInRequired` if nobody is signed in
    /// * `AppError::Network` if the first load fails
    pub async fn sign_in(
        syncer: StatusSyncer,
        auth: Arc<dyn AuthProvider>,
    ) -> Result<Self, AppError> {
        let session = auth.current_session().ok_or(AppError::SignInRequired)?;
        let snapshot = syncer.get_snapshot(session.session_id).await?;
        let view = Arc::new(RwLock::new(StatusView::from_snapshot(snapshot)));

        let live_view = Arc::clone(&view);
        let live = syncer.subscribe(session.session_id, move |snapshot| {
            *live_view.write() = StatusView::from_snapshot(snapshot.clone());
        })?;

        info!(session = %session.session_id, user = %session.user_id, "status session started");
        Ok(Self {
            syncer,
            auth,
            session_id: session.session_id,
            user_id: session.user_id,
            view,
            live,
        })
    }

    /// Session this context belongs to
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Signed-in user
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Last known view
    pub fn view(&self) -> StatusView {
        self.view.read().clone()
    }

    /// Re-read the cached snapshot, refreshing it in the background.
    ///
    /// # Errors
    /// `AppError::SignInRequired` once the session has ended.
    pub async fn refresh(&self) -> Result<StatusView, AppError> {
        let snapshot = self.syncer.get_snapshot(self.session_id).await?;
        Ok(self.store(snapshot))
    }

    /// Explicit "sync now". Failures keep the visible status and produce a toast.
    pub async fn force_sync(&self) -> ForceSyncOutcome {
        match self.syncer.force_sync(self.session_id).await {
            Ok(snapshot) => ForceSyncOutcome {
                view: self.store(snapshot),
                toast: None,
            },
            Err(error) => {
                let error = AppError::from(error);
                warn!(session = %self.session_id, %error, "force sync failed");
                ForceSyncOutcome {
                    view: self.view(),
                    toast: Some(Toast::from(&error)),
                }
            }
        }
    }

    /// Observe every new view. Drop the handle to stop.
    ///
    /// # Errors
    /// * `AppError::SignInRequired` once the session has ended
    /// * `AppError::Network` if the remote listener cannot be attached
    pub fn subscribe<F>(&self, on_change: F) -> Result<Subscription, AppError>
    where
        F: Fn(&StatusView) + Send + Sync + 'static,
    {
        let subscription = self.syncer.subscribe(self.session_id, move |snapshot| {
            on_change(&StatusView::from_snapshot(snapshot.clone()));
        })?;
        Ok(subscription)
    }

    /// Route guard for this session. Sends to sign-in once the session is gone.
    pub fn guard(&self, route: Route) -> RouteDecision {
        if self.auth.session_matching(self.session_id).is_none() {
            return match route {
                Route::SignIn => RouteDecision::Allow,
                _ => RouteDecision::Redirect(Route::SignIn),
            };
        }
        guard_route(route, &self.view.read().flags)
    }

    /// Gate a button press against the last known snapshot.
    pub fn attempt(&self, action: GatedAction) -> GateOutcome {
        gate_action(action, &self.view.read().snapshot)
    }

    /// Menu for the last known flags
    pub fn menu(&self) -> Vec<MenuEntry> {
        menu_entries(&self.view.read().flags)
    }

    /// Submit or resubmit verification documents.
    ///
    /// # Errors
    /// * `AppError::UserAction` if verification is pending or verified
    /// * `AppError::Network` if the record cannot be read or written
    /// * `AppError::SignInRequired` once the session has ended
    pub async fn resubmit_verification(&self) -> Result<StatusView, AppError> {
        let snapshot = self.syncer.submit_verification(self.session_id).await?;
        Ok(self.store(snapshot))
    }

    /// Tear the session down: live subscription, listeners and cache.
    pub fn sign_out(self) {
        let Self {
            syncer,
            session_id,
            live,
            ..
        } = self;
        drop(live);
        syncer.end_session(session_id);
        info!(session = %session_id, "status session ended");
    }

    fn store(&self, snapshot: UserStatusSnapshot) -> StatusView {
        let view = StatusView::from_snapshot(snapshot);
        *self.view.write() = view.clone();
        view
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("session_id", &self.session_id)
            .field("user_id", &self.user_id)
            .field("live", &self.live)
            .finish_non_exhaustive()
    }
}
