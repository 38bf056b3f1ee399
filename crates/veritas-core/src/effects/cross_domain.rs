//! Cross-domain invocation effect trait
//!
//! Some ledger domains carry no verifier registry of their own and must ask
//! another domain's contract surface. The call is synchronous from the
//! caller's point of view but is **not** part of the local transaction: a
//! successful remote read followed by a failed local write does not roll back
//! together, and no retry or timeout policy is applied here.

use crate::identifiers::DomainRef;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Failures of the cross-domain transport, as opposed to empty answers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum CrossDomainError {
    /// No route to the named domain
    #[error("domain {0} is not reachable")]
    UnknownDomain(DomainRef),
    /// The remote surface does not expose the operation
    #[error("operation {operation} is not exposed by domain {domain}")]
    UnsupportedOperation {
        /// Domain that was called
        domain: DomainRef,
        /// Operation requested
        operation: String,
    },
    /// The remote call itself failed
    #[error("remote call failed: {0}")]
    CallFailed(String),
}

/// Invoke a read-only operation on another ledger domain
#[async_trait]
pub trait CrossDomainEffects: Send + Sync {
    /// Returns the remote payload, or `None` when the remote record is absent
    async fn invoke_domain(
        &self,
        domain: &DomainRef,
        operation: &str,
        args: &[String],
    ) -> Result<Option<Vec<u8>>, CrossDomainError>;
}
