//! Scripted authentication provider

use banque_core::{AuthProvider, AuthSession, SessionId, UserId};
use parking_lot::Mutex;
use std::sync::Arc;

/// Auth provider whose session is driven by the test. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockAuthProvider {
    session: Arc<Mutex<Option<AuthSession>>>,
}

impl MockAuthProvider {
    /// Provider with nobody signed in
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign a user in with a fresh session id.
    pub fn sign_in(&self, user_id: impl Into<UserId>, email_verified: bool) -> SessionId {
        let session_id = SessionId::new();
        *self.session.lock() = Some(AuthSession {
            session_id,
            user_id: user_id.into(),
            email_verified,
        });
        session_id
    }

    /// Sign the current user out.
    pub fn sign_out(&self) {
        *self.session.lock() = None;
    }

    /// Change the email verification claim of the current session.
    pub fn set_email_verified(&self, email_verified: bool) {
        if let Some(session) = self.session.lock().as_mut() {
            session.email_verified = email_verified;
        }
    }
}

impl AuthProvider for MockAuthProvider {
    fn current_session(&self) -> Option<AuthSession> {
        self.session.lock().clone()
    }
}
