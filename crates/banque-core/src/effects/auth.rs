//! Authentication provider

use crate::identifiers::{SessionId, UserId};
use serde::{Deserialize, Serialize};

/// The active authenticated session as seen by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Session identifier, minted at sign-in
    pub session_id: SessionId,
    /// Id of the user's record in the document store
    pub user_id: UserId,
    /// Provider's email verification claim; authoritative for email only
    pub email_verified: bool,
}

/// Source of the current session and its claims.
pub trait AuthProvider: Send + Sync {
    /// The signed-in session, if any.
    fn current_session(&self) -> Option<AuthSession>;

    /// The signed-in session only when it matches `session_id`.
    fn session_matching(&self, session_id: SessionId) -> Option<AuthSession> {
        self.current_session()
            .filter(|session| session.session_id == session_id)
    }
}
