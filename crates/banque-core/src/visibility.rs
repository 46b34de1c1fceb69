//! Status → feature visibility mapping
//!
//! Pure and total: every status maps to exactly one set of flags, with no I/O
//! and no error path. Billing, transfers, beneficiaries and messaging require
//! a verified account; card limits and documents are always reachable so that
//! unverified users can still manage their card and upload KYC documents.

use crate::snapshot::UserStatusSnapshot;
use crate::status::VerificationStatus;
use serde::{Deserialize, Serialize};

/// A feature area whose visibility depends on verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Billing and statements
    Billing,
    /// Outgoing transfers
    Transfers,
    /// Card limit management
    CardLimits,
    /// Transfer beneficiaries
    Beneficiaries,
    /// KYC and account documents
    Documents,
    /// Secure messaging with the bank
    Messaging,
}

impl Feature {
    /// All features.
    pub const ALL: [Self; 6] = [
        Self::Billing,
        Self::Transfers,
        Self::CardLimits,
        Self::Beneficiaries,
        Self::Documents,
        Self::Messaging,
    ];

    /// Whether the feature stays visible for unverified users.
    pub fn always_visible(&self) -> bool {
        matches!(self, Self::CardLimits | Self::Documents)
    }
}

/// Feature visibility derived from a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibilityFlags {
    /// Billing section visible
    pub billing: bool,
    /// Transfers enabled
    pub transfers: bool,
    /// Card limits visible
    pub card_limits: bool,
    /// Beneficiary management enabled
    pub beneficiaries: bool,
    /// Documents visible
    pub documents: bool,
    /// Messaging enabled
    pub messaging: bool,
}

impl VisibilityFlags {
    /// Flags for a canonical status.
    pub fn for_status(status: VerificationStatus) -> Self {
        let verified = status.is_verified();
        Self {
            billing: verified,
            transfers: verified,
            card_limits: true,
            beneficiaries: verified,
            documents: true,
            messaging: verified,
        }
    }

    /// Whether a feature is enabled.
    pub fn allows(&self, feature: Feature) -> bool {
        match feature {
            Feature::Billing => self.billing,
            Feature::Transfers => self.transfers,
            Feature::CardLimits => self.card_limits,
            Feature::Beneficiaries => self.beneficiaries,
            Feature::Documents => self.documents,
            Feature::Messaging => self.messaging,
        }
    }
}

/// Resolve the visibility flags for a snapshot.
pub fn resolve_visibility(snapshot: &UserStatusSnapshot) -> VisibilityFlags {
    VisibilityFlags::for_status(snapshot.status())
}
