//! Append-only signature log

use serde::{Deserialize, Serialize};
use veritas_core::{IdentityId, Timestamp};

/// One signing event on a document or e-form
///
/// Immutable once appended; there is no removal operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Signature {
    /// Hash of the signature material
    pub hash: String,
    /// One-time code presented with the signature
    pub otp: String,
    /// Identity that signed
    pub signer: IdentityId,
    /// Signing time supplied by the caller
    pub timestamp: Timestamp,
}

/// Records carrying an append-only signature log
///
/// Signing never deduplicates: re-signing with the same hash appends a second
/// entry. A retried sign transaction can therefore log the same signature
/// twice.
pub trait Signable {
    /// Signatures in append order
    fn signatures(&self) -> &[Signature];

    /// Mutable access for appends
    fn signatures_mut(&mut self) -> &mut Vec<Signature>;

    /// Append a signature to the log
    fn append_signature(&mut self, signature: Signature) {
        self.signatures_mut().push(signature);
    }

    /// Whether any signature carries `hash`
    fn signed_with(&self, hash: &str) -> bool {
        self.signatures().iter().any(|s| s.hash == hash)
    }
}
