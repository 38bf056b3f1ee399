//! Veritas Testkit - Layer 8: Testing
//!
//! Shared test infrastructure for the veritas crates:
//!
//! - [`fixtures`]: a memory-backed contract harness with credential helpers
//! - [`faulty`]: a ledger wrapper that fails on demand
//! - [`strategies`]: proptest strategies for records and inputs
//! - [`init_test_tracing`]: log capture for tests
//!
//! Only use this crate from `[dev-dependencies]`.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

pub mod faulty;
pub mod fixtures;
pub mod strategies;

pub use faulty::{FaultPlan, FaultyLedger};
pub use fixtures::{subject, user_credential, verifier_credential, Harness};

// Re-export proptest for convenience
pub use proptest;

/// Install a test-writer `tracing` subscriber once per process
///
/// Honours `RUST_LOG`; defaults to `debug` for the veritas crates.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("veritas_contracts=debug,veritas_records=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
