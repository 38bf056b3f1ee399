//! Effect interfaces consumed by the contracts
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `veritas-effects` (ledger handlers), `veritas-contracts` (domain router)
//! - **Usage**: every contract operation
//!
//! The ledger itself (commit ordering, consensus, state database) is supplied
//! by the surrounding platform. These traits are the narrow seam through which
//! the contracts reach it.

pub mod cross_domain;
pub mod ledger;

pub use cross_domain::{CrossDomainEffects, CrossDomainError};
pub use ledger::{LedgerEffects, LedgerEntry, LedgerError};
