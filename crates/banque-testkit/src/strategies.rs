//! Property test strategies for user records

use banque_core::record::fields;
use banque_core::{Document, VerificationStatus};
use proptest::prelude::*;
use serde_json::Value;

// Re-export proptest for convenience
pub use proptest;

/// Any canonical status
pub fn arb_status() -> impl Strategy<Value = VerificationStatus> {
    prop_oneof![
        Just(VerificationStatus::Unverified),
        Just(VerificationStatus::Pending),
        Just(VerificationStatus::Verified),
        Just(VerificationStatus::Rejected),
    ]
}

/// Raw status field values as found in stored records: canonical spellings,
/// legacy synonyms, blanks, garbage, and values of the wrong JSON type.
pub fn arb_status_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_status().prop_map(|status| Value::from(status.as_str())),
        prop::sample::select(vec![
            "Approved", "in_review", "SUBMITTED", "refused", "not_started", "",
        ])
        .prop_map(Value::from),
        "[a-z]{1,8}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        Just(Value::Null),
    ]
}

/// User documents with any subset of the consumed fields.
pub fn arb_user_document() -> impl Strategy<Value = Document> {
    (
        prop::option::of(arb_status_value()),
        prop::option::of(arb_status_value()),
        prop::option::of(arb_status_value()),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of("[A-Za-z ]{0,24}"),
    )
        .prop_map(
            |(kyc, verification, status, email, legacy_email, billing, reason)| {
                let mut doc = Document::new();
                let mut put = |key: &str, value: Option<Value>| {
                    if let Some(value) = value {
                        doc.insert(key.to_string(), value);
                    }
                };
                put(fields::KYC_STATUS, kyc);
                put(fields::VERIFICATION_STATUS, verification);
                put(fields::STATUS, status);
                put(fields::EMAIL_VERIFIED, email.map(Value::Bool));
                put(fields::IS_EMAIL_VERIFIED, legacy_email.map(Value::Bool));
                put(fields::REJECTION_REASON, reason.map(Value::String));
                if let Some(billing) = billing {
                    doc.insert(
                        "billing".to_string(),
                        serde_json::json!({ "billingVisible": billing }),
                    );
                }
                doc
            },
        )
}
