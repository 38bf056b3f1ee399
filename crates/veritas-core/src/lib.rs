//! Veritas Core - Layer 1: Foundation
//!
//! Foundational types and effect interfaces for the veritas ledger contracts.
//! Contains no ledger implementation and no contract logic.
//!
//! # What lives here
//!
//! - `VeritasError`: the unified failure taxonomy
//! - Identifiers (`IdentityId`, `TransactionId`, `DomainRef`)
//! - RFC-3339 timestamp parsing
//! - Credential parsing (invoker ID, verifier role attribute)
//! - `Selector`: portable structured query predicates
//! - `VeritasConfig`: TOML + environment configuration
//! - Effect traits: `LedgerEffects`, `CrossDomainEffects`

#![allow(missing_docs)]
#![forbid(unsafe_code)]

/// Contract configuration
pub mod config;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Identity, transaction and domain identifiers
pub mod identifiers;

/// Caller credentials and role attributes
pub mod identity;

/// Structured ledger query predicates
pub mod selector;

/// Timestamp parsing and formatting
pub mod time;

pub use config::{RegistryLocation, VeritasConfig};
pub use effects::{CrossDomainEffects, CrossDomainError, LedgerEffects, LedgerEntry, LedgerError};
pub use errors::{ErrorCode, Result as VeritasResult, VeritasError};
pub use identifiers::{DomainRef, IdentityId, TransactionId};
pub use identity::{is_verifier_role, resolve_invoker_id, Credential, DEFAULT_ROLE_ATTRIBUTE};
pub use selector::{Clause, Selector};
pub use time::{format_instant, parse_instant, parse_instants, Timestamp};
