//! Record reconciliation
//!
//! Turns one [`RemoteUserRecord`] plus the provider's email claim into a
//! snapshot, the corrective writes the record needs, and the list of
//! inconsistencies found along the way.
//!
//! Precedence for the canonical status is `kycStatus`, then
//! `verificationStatus`, then `status`; the first field holding a recognized
//! status wins and a record with none of them is `unverified`. The provider is
//! authoritative for email verification only, never for KYC status.

use banque_core::record::fields;
use banque_core::{
    FieldPatch, RemoteUserRecord, SyncConfig, UserId, UserStatusSnapshot, VerificationStatus,
    VisibilityFlags,
};
use std::fmt;

/// A disagreement found in a remote record. Logged, never returned as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// A lower-precedence status field disagrees with the canonical status
    LegacyStatusDisagreement {
        /// Field holding the disagreeing value
        field: &'static str,
        /// Value stored in that field
        stored: VerificationStatus,
        /// Canonical status
        canonical: VerificationStatus,
    },
    /// A status field holds a string that is not a known status
    UnrecognizedStatus {
        /// Field holding the value
        field: &'static str,
        /// Raw stored value
        value: String,
    },
    /// A stored email flag disagrees with the provider
    EmailVerifiedMismatch {
        /// Field holding the stale copy
        field: &'static str,
        /// Stored value (absent counts as `false`)
        stored: bool,
        /// Provider claim
        provider: bool,
    },
    /// The stored billing mirror disagrees with the derived billing flag
    BillingMirrorMismatch {
        /// Stored `billing.billingVisible`
        stored: bool,
        /// Flag derived from the canonical status
        derived: bool,
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyStatusDisagreement {
                field,
                stored,
                canonical,
            } => write!(f, "{field} is {stored} but canonical status is {canonical}"),
            Self::UnrecognizedStatus { field, value } => {
                write!(f, "{field} holds unrecognized status {value:?}")
            }
            Self::EmailVerifiedMismatch {
                field,
                stored,
                provider,
            } => write!(f, "{field} is {stored} but provider reports {provider}"),
            Self::BillingMirrorMismatch { stored, derived } => {
                write!(f, "{} is {stored} but derived billing visibility is {derived}", fields::BILLING_VISIBLE)
            }
        }
    }
}

/// Outcome of reconciling one record
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Snapshot to surface
    pub snapshot: UserStatusSnapshot,
    /// Writes that bring the stored record in line; empty when nothing to fix
    pub corrections: FieldPatch,
    /// Everything that disagreed
    pub inconsistencies: Vec<Inconsistency>,
    /// `updatedAt` of the source record, used to order remote states
    pub updated_at: Option<u64>,
}

impl Reconciliation {
    /// Whether the record was fully consistent.
    pub fn is_consistent(&self) -> bool {
        self.inconsistencies.is_empty()
    }

    /// Log every inconsistency at warn level.
    pub fn log(&self, user_id: &UserId) {
        for inconsistency in &self.inconsistencies {
            tracing::warn!(user = %user_id, %inconsistency, "inconsistent user record");
        }
    }
}

/// Canonical status and the field it came from (`None` when defaulted).
pub fn canonical_status(record: &RemoteUserRecord) -> (VerificationStatus, Option<&'static str>) {
    record
        .status_fields()
        .into_iter()
        .find_map(|(field, raw)| {
            raw.and_then(VerificationStatus::parse_lenient)
                .map(|status| (status, Some(field)))
        })
        .unwrap_or((VerificationStatus::Unverified, None))
}

/// Reconcile a record against the provider's email claim.
pub fn reconcile(
    record: &RemoteUserRecord,
    provider_email_verified: bool,
    now_ms: u64,
    config: &SyncConfig,
) -> Reconciliation {
    let mut corrections = FieldPatch::new();
    let mut inconsistencies = Vec::new();

    let (canonical, _) = canonical_status(record);
    for (field, raw) in record.status_fields() {
        let Some(raw) = raw else { continue };
        match VerificationStatus::parse_lenient(raw) {
            Some(stored) if stored != canonical => {
                inconsistencies.push(Inconsistency::LegacyStatusDisagreement {
                    field,
                    stored,
                    canonical,
                });
                if config.normalize_legacy_status {
                    corrections.insert_set(field, canonical.as_str());
                }
            }
            Some(_) => {}
            None if raw.trim().is_empty() => {}
            None => inconsistencies.push(Inconsistency::UnrecognizedStatus {
                field,
                value: raw.to_string(),
            }),
        }
    }

    // A missing primary copy counts as `false`; the legacy copy is only
    // corrected when it exists.
    let email_copies = [
        (fields::EMAIL_VERIFIED, Some(record.email_verified.unwrap_or(false))),
        (fields::IS_EMAIL_VERIFIED, record.is_email_verified),
    ];
    for (field, stored) in email_copies {
        let Some(stored) = stored else { continue };
        if stored != provider_email_verified {
            inconsistencies.push(Inconsistency::EmailVerifiedMismatch {
                field,
                stored,
                provider: provider_email_verified,
            });
            if config.correct_email_verified {
                corrections.insert_set(field, provider_email_verified);
            }
        }
    }

    let derived_billing = VisibilityFlags::for_status(canonical).billing;
    if let Some(stored) = record.billing_visible {
        if stored != derived_billing {
            inconsistencies.push(Inconsistency::BillingMirrorMismatch {
                stored,
                derived: derived_billing,
            });
        }
    }

    let snapshot = UserStatusSnapshot::new(
        canonical,
        provider_email_verified,
        now_ms,
        record.rejection_reason.clone(),
    );

    Reconciliation {
        snapshot,
        corrections,
        inconsistencies,
        updated_at: record.updated_at,
    }
}
