//! Error types for the verification-status slice
//!
//! Two layers: [`StoreError`] is what the remote document store reports,
//! [`SyncError`] is what callers of the status syncer see. Every store failure
//! collapses into [`SyncError::RemoteUnavailable`]; callers only ever need to
//! distinguish "sign in again" from "retry later".

use crate::status::VerificationStatus;
use serde::{Deserialize, Serialize};

/// Failure reported by a [`UserRecordStore`](crate::effects::UserRecordStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum StoreError {
    /// Transport failure or backend outage
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Error message describing the outage
        message: String,
    },

    /// Security rules rejected the read or write
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// Error message describing the rejected access
        message: String,
    },

    /// The document could not be interpreted at all
    #[error("malformed document: {message}")]
    Malformed {
        /// Error message describing the malformed payload
        message: String,
    },
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a malformed document error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Error surfaced by status synchronization calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SyncError {
    /// No active session matches the requested session id
    #[error("not authenticated")]
    NotAuthenticated,

    /// The remote record could not be read or written
    #[error("remote unavailable: {message}")]
    RemoteUnavailable {
        /// Error message describing the remote failure
        message: String,
    },

    /// The requested status transition is not allowed from the current status
    #[error("cannot {action} while verification is {from}")]
    InvalidTransition {
        /// Canonical status at the time of the request
        from: VerificationStatus,
        /// Action that was attempted
        action: String,
    },

    /// Internal system error
    #[error("internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl SyncError {
    /// Create a remote unavailable error
    pub fn remote_unavailable(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
        }
    }

    /// Create an invalid transition error
    pub fn invalid_transition(from: VerificationStatus, action: impl Into<String>) -> Self {
        Self::InvalidTransition {
            from,
            action: action.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RemoteUnavailable { .. })
    }
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        Self::remote_unavailable(err.to_string())
    }
}

/// Standard Result type for status synchronization
pub type Result<T> = std::result::Result<T, SyncError>;
