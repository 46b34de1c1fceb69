//! Canonical verification status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// KYC verification status of a user.
///
/// This is the single authoritative status value; the legacy string fields of
/// the remote record are reconciled into exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// No verification submitted yet
    #[default]
    Unverified,
    /// Submitted and awaiting review
    Pending,
    /// Review passed
    Verified,
    /// Review failed; the user may resubmit
    Rejected,
}

impl VerificationStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Unverified,
        Self::Pending,
        Self::Verified,
        Self::Rejected,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }

    /// Interpret a stored status string.
    ///
    /// Matching is case-insensitive and accepts the synonyms that accumulated
    /// in stored records over time. Returns `None` for empty or unknown
    /// values, which reconciliation treats as absent.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "verified" | "approved" | "validated" | "valid" => Some(Self::Verified),
            "pending" | "submitted" | "in_review" | "under_review" | "processing" | "review" => {
                Some(Self::Pending)
            }
            "rejected" | "refused" | "denied" | "declined" | "failed" => Some(Self::Rejected),
            "unverified" | "not_started" | "none" | "new" => Some(Self::Unverified),
            _ => None,
        }
    }

    /// Whether verified-only features are unlocked.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Whether the user may submit (or resubmit) verification documents.
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Unverified | Self::Rejected)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown verification status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for VerificationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
