//! Remote user record model
//!
//! The document store holds one loosely-typed JSON object per user. Fields were
//! added by different generations of the app and by admin tooling, so several
//! of them duplicate each other. [`RemoteUserRecord`] is a lenient projection of
//! just the fields the status slice consumes: a value of the wrong JSON type
//! is treated as absent rather than failing the whole read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A raw document as returned by the store.
pub type Document = Map<String, Value>;

/// Field paths consumed or written by the status slice.
pub mod fields {
    /// Primary KYC status string
    pub const KYC_STATUS: &str = "kycStatus";
    /// Older status string written by the first verification flow
    pub const VERIFICATION_STATUS: &str = "verificationStatus";
    /// Oldest generic status string
    pub const STATUS: &str = "status";
    /// Stored copy of the provider's email verification flag
    pub const EMAIL_VERIFIED: &str = "emailVerified";
    /// Legacy duplicate of [`EMAIL_VERIFIED`]
    pub const IS_EMAIL_VERIFIED: &str = "isEmailVerified";
    /// Stored billing visibility mirror
    pub const BILLING_VISIBLE: &str = "billing.billingVisible";
    /// Reviewer's rejection reason
    pub const REJECTION_REASON: &str = "rejectionReason";
    /// Rejection reason as written by the admin console
    pub const KYC_REJECTION_REASON: &str = "kycRejectionReason";
    /// Rejection reason as written by migration scripts
    pub const REJECT_REASON: &str = "rejectReason";
    /// Last remote modification time
    pub const UPDATED_AT: &str = "updatedAt";

    /// Status fields in reconciliation precedence order.
    pub const STATUS_PRECEDENCE: [&str; 3] = [KYC_STATUS, VERIFICATION_STATUS, STATUS];

    /// Rejection reason fields in lookup order.
    pub const REJECTION_REASONS: [&str; 3] =
        [REJECTION_REASON, KYC_REJECTION_REASON, REJECT_REASON];
}

/// The consumed fields of a user document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUserRecord {
    /// `kycStatus`
    pub kyc_status: Option<String>,
    /// `verificationStatus`
    pub verification_status: Option<String>,
    /// `status`
    pub status: Option<String>,
    /// `emailVerified`
    pub email_verified: Option<bool>,
    /// `isEmailVerified`
    pub is_email_verified: Option<bool>,
    /// `billing.billingVisible`
    pub billing_visible: Option<bool>,
    /// First present of the rejection reason fields
    pub rejection_reason: Option<String>,
    /// `updatedAt`, in ms since epoch
    pub updated_at: Option<u64>,
}

impl RemoteUserRecord {
    /// Project a store document.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            kyc_status: string_at(doc, fields::KYC_STATUS),
            verification_status: string_at(doc, fields::VERIFICATION_STATUS),
            status: string_at(doc, fields::STATUS),
            email_verified: bool_at(doc, fields::EMAIL_VERIFIED),
            is_email_verified: bool_at(doc, fields::IS_EMAIL_VERIFIED),
            billing_visible: bool_at(doc, fields::BILLING_VISIBLE),
            rejection_reason: fields::REJECTION_REASONS
                .iter()
                .find_map(|path| string_at(doc, path))
                .filter(|reason| !reason.trim().is_empty()),
            updated_at: lookup(doc, fields::UPDATED_AT).and_then(timestamp_ms),
        }
    }

    /// Project an optional document; a missing document has every field absent.
    pub fn from_optional(doc: Option<&Document>) -> Self {
        doc.map(Self::from_document).unwrap_or_default()
    }

    /// Raw status values in precedence order, paired with their field path.
    pub fn status_fields(&self) -> [(&'static str, Option<&str>); 3] {
        [
            (fields::KYC_STATUS, self.kyc_status.as_deref()),
            (fields::VERIFICATION_STATUS, self.verification_status.as_deref()),
            (fields::STATUS, self.status.as_deref()),
        ]
    }
}

/// Resolve a dotted path inside a document.
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn string_at(doc: &Document, path: &str) -> Option<String> {
    lookup(doc, path)?.as_str().map(str::to_string)
}

fn bool_at(doc: &Document, path: &str) -> Option<bool> {
    lookup(doc, path)?.as_bool()
}

/// Accepts integer milliseconds or a `{seconds, nanoseconds}` timestamp object.
fn timestamp_ms(value: &Value) -> Option<u64> {
    if let Some(ms) = value.as_u64() {
        return Some(ms);
    }
    let obj = value.as_object()?;
    let seconds = obj
        .get("seconds")
        .or_else(|| obj.get("_seconds"))?
        .as_u64()?;
    let nanos = obj
        .get("nanoseconds")
        .or_else(|| obj.get("_nanoseconds"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    seconds
        .checked_mul(1_000)
        .map(|ms| ms.saturating_add(nanos / 1_000_000))
}

/// One field operation of a partial update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum PatchOp {
    /// Set the field, creating intermediate objects as needed
    Set(Value),
    /// Remove the field if present
    Delete,
}

/// A partial update keyed by dotted field path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPatch {
    ops: BTreeMap<String, PatchOp>,
}

impl FieldPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FieldPatch::insert_set`]
    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_set(path, value);
        self
    }

    /// Builder form of [`FieldPatch::insert_delete`]
    pub fn delete(mut self, path: impl Into<String>) -> Self {
        self.insert_delete(path);
        self
    }

    /// Set `path` to `value`
    pub fn insert_set(&mut self, path: impl Into<String>, value: impl Into<Value>) {
        self.ops.insert(path.into(), PatchOp::Set(value.into()));
    }

    /// Remove `path`
    pub fn insert_delete(&mut self, path: impl Into<String>) {
        self.ops.insert(path.into(), PatchOp::Delete);
    }

    /// Operation recorded for a path
    pub fn get(&self, path: &str) -> Option<&PatchOp> {
        self.ops.get(path)
    }

    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of field operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Apply to a document the way the store applies partial updates.
    pub fn apply_to(&self, doc: &mut Document) {
        for (path, op) in &self.ops {
            let segments: Vec<&str> = path.split('.').collect();
            match op {
                PatchOp::Set(value) => set_path(doc, &segments, value.clone()),
                PatchOp::Delete => delete_path(doc, &segments),
            }
        }
    }
}

fn set_path(obj: &mut Document, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            obj.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = obj
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                set_path(child, rest, value);
            }
        }
    }
}

fn delete_path(obj: &mut Document, segments: &[&str]) {
    match segments {
        [] => {}
        [leaf] => {
            obj.remove(*leaf);
        }
        [head, rest @ ..] => {
            if let Some(Value::Object(child)) = obj.get_mut(*head) {
                delete_path(child, rest);
            }
        }
    }
}
