//! Reconciled user status snapshot

use crate::status::VerificationStatus;
use serde::{Deserialize, Serialize};

/// The reconciled verification state of one user at one point in time.
///
/// Snapshots are immutable: every sync builds a new one and swaps it in whole.
/// The rejection reason is only carried while the status is
/// [`VerificationStatus::Rejected`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatusSnapshot {
    status: VerificationStatus,
    email_verified: bool,
    last_updated: u64,
    rejection_reason: Option<String>,
}

impl UserStatusSnapshot {
    /// Build a snapshot. `last_updated` is milliseconds since the Unix epoch.
    pub fn new(
        status: VerificationStatus,
        email_verified: bool,
        last_updated: u64,
        rejection_reason: Option<String>,
    ) -> Self {
        let rejection_reason = match status {
            VerificationStatus::Rejected => rejection_reason,
            _ => None,
        };
        Self {
            status,
            email_verified,
            last_updated,
            rejection_reason,
        }
    }

    /// Canonical verification status
    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    /// Email verification as reported by the authentication provider
    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    /// When this snapshot was computed (ms since epoch)
    pub fn last_updated(&self) -> u64 {
        self.last_updated
    }

    /// Reviewer's reason, present only for rejected verifications
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Equality ignoring `last_updated`.
    pub fn equivalent(&self, other: &Self) -> bool {
        self.status == other.status
            && self.email_verified == other.email_verified
            && self.rejection_reason == other.rejection_reason
    }
}
