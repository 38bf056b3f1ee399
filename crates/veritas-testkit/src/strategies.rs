//! Property test strategies for veritas inputs

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use veritas_core::{format_instant, IdentityId, Timestamp};
use veritas_records::{Signature, Verification, Verifier};

/// Identity names that are valid CN values
pub fn arb_identity_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,9}"
}

pub fn arb_identity() -> impl Strategy<Value = IdentityId> {
    arb_identity_name().prop_map(IdentityId::new)
}

/// Free text, including empty and non-ASCII values
pub fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 _-]{1,12}",
        "\\PC{1,8}",
        Just("Grundstück Nr. 7 – 東京".to_string()),
    ]
}

/// Instants between 1970 and roughly 2096, with sub-second precision
pub fn arb_instant() -> impl Strategy<Value = Timestamp> {
    (0i64..4_000_000_000, 0u32..1_000_000_000).prop_map(|(secs, nanos)| {
        DateTime::<Utc>::from_timestamp(secs, nanos).unwrap_or_default()
    })
}

/// RFC-3339 text for an arbitrary instant
pub fn arb_rfc3339() -> impl Strategy<Value = String> {
    arb_instant().prop_map(|ts| format_instant(&ts))
}

/// Strings that are not RFC-3339 instants
pub fn arb_bad_date() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("not-a-date".to_string()),
        Just("2030-13-01T00:00:00Z".to_string()),
        Just("2030-01-01".to_string()),
        Just(String::new()),
        "[a-z ]{1,12}",
    ]
}

pub fn arb_verifier() -> impl Strategy<Value = Verifier> {
    (arb_identity(), arb_text(), arb_text()).prop_map(|(id, name, grade)| Verifier {
        id,
        name,
        grade,
    })
}

pub fn arb_verification() -> impl Strategy<Value = Verification> {
    (arb_verifier(), arb_instant()).prop_map(|(verifier, expiry)| Verification { verifier, expiry })
}

pub fn arb_signature() -> impl Strategy<Value = Signature> {
    (arb_text(), arb_text(), arb_identity(), arb_instant()).prop_map(
        |(hash, otp, signer, timestamp)| Signature {
            hash,
            otp,
            signer,
            timestamp,
        },
    )
}
