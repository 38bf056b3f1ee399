//! Veritas Contracts - Layer 4: Orchestration
//!
//! The operations callers invoke. Each mutating operation resolves the
//! invoker, loads the records it needs, applies the record-layer rules in
//! memory and writes back once at the end, so a failed operation writes
//! nothing.
//!
//! - [`UserContract`]: users, profile-field verification, verifier registry
//! - [`DocumentContract`]: documents and e-forms
//! - [`AssetContract`]: digital assets
//! - [`ContractRuntime`]: name-based dispatch into the contracts, returning
//!   a [`Response`] envelope

#![forbid(unsafe_code)]

pub mod asset;
pub mod context;
pub mod dispatch;
pub mod document;
pub mod envelope;
pub mod gate;
pub mod lookup;
pub mod router;
pub mod user;

pub use asset::AssetContract;
pub use context::ContractContext;
pub use dispatch::{Args, ContractRuntime, Operation};
pub use document::DocumentContract;
pub use envelope::Response;
pub use gate::require_verifier;
pub use lookup::{fetch_verifier, GET_VERIFIER_OPERATION};
pub use router::LocalDomainRouter;
pub use user::UserContract;
