//! Veritas Effects - Layer 3: Handlers
//!
//! Stateful implementations of the ledger effect trait from `veritas-core`.
//! The real ledger is supplied by the hosting platform; these handlers stand
//! in for it in tests and in the command-line tool.
//!
//! - [`MemoryLedgerHandler`]: ordered in-memory map
//! - [`FilesystemLedgerHandler`]: one file per key under a directory

#![forbid(unsafe_code)]

/// Ledger handlers
pub mod ledger;

pub use ledger::{FilesystemLedgerHandler, MemoryLedgerHandler};
