//! Veritas Records - Layer 2: Domain
//!
//! Record types and the rules that keep them consistent on a flat key/value
//! ledger:
//!
//! - [`codec`]: the stored envelope and strict decoding
//! - [`kind`]: one key namespace per record kind
//! - [`verification`]: at most one verification per verifier on any list
//! - [`signature`]: append-only signature logs
//! - [`asset`]: owner-gated transfer and duplicate-free document links
//! - [`store`]: typed reads and writes through [`veritas_core::LedgerEffects`]
//!
//! Nothing here resolves identities or checks verifier privilege; that is the
//! job of `veritas-contracts`.

#![forbid(unsafe_code)]

pub mod asset;
pub mod codec;
pub mod document;
pub mod kind;
pub mod queries;
pub mod share;
pub mod signature;
pub mod store;
pub mod user;
pub mod verification;
pub mod verifier;

pub use asset::DigitalAsset;
pub use codec::{decode, decode_fixed, encode, encode_fixed, FixedKind, Record, SCHEMA_VERSION};
pub use document::{Document, DocumentKind};
pub use kind::RecordKind;
pub use share::DocumentShare;
pub use signature::{Signable, Signature};
pub use store::RecordStore;
pub use user::User;
pub use verification::{
    SnapshotPolicy, UpsertOutcome, Verifiable, Verification, VerificationStatus,
};
pub use verifier::Verifier;
