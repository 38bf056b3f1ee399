//! In-process cross-domain router
//!
//! Maps domain names to ledgers hosted in the same process and serves the
//! read-only contract surface other domains need. Hosting platforms supply
//! their own [`CrossDomainEffects`] implementation instead.

use crate::lookup::GET_VERIFIER_OPERATION;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use veritas_core::{CrossDomainEffects, CrossDomainError, DomainRef, LedgerEffects};
use veritas_records::{encode_fixed, RecordStore, Verifier};

/// Router over ledgers living in this process
#[derive(Clone, Default)]
pub struct LocalDomainRouter {
    domains: HashMap<DomainRef, Arc<dyn LedgerEffects>>,
}

impl LocalDomainRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ledger` reachable as `domain`
    pub fn with_domain(
        mut self,
        domain: impl Into<DomainRef>,
        ledger: Arc<dyn LedgerEffects>,
    ) -> Self {
        self.domains.insert(domain.into(), ledger);
        self
    }

    /// Register or replace a domain
    pub fn register(&mut self, domain: impl Into<DomainRef>, ledger: Arc<dyn LedgerEffects>) {
        self.domains.insert(domain.into(), ledger);
    }

    async fn get_verifier(
        ledger: &dyn LedgerEffects,
        args: &[String],
    ) -> Result<Option<Vec<u8>>, CrossDomainError> {
        let [verifier_id] = args else {
            return Err(CrossDomainError::CallFailed(format!(
                "{GET_VERIFIER_OPERATION} expects 1 argument, got {}",
                args.len()
            )));
        };
        let verifier = RecordStore::new(ledger)
            .get::<Verifier>(verifier_id)
            .await
            .map_err(|e| CrossDomainError::CallFailed(e.to_string()))?;
        verifier
            .map(|v| encode_fixed(&v))
            .transpose()
            .map_err(|e| CrossDomainError::CallFailed(e.to_string()))
    }
}

#[async_trait]
impl CrossDomainEffects for LocalDomainRouter {
    async fn invoke_domain(
        &self,
        domain: &DomainRef,
        operation: &str,
        args: &[String],
    ) -> Result<Option<Vec<u8>>, CrossDomainError> {
        let ledger = self
            .domains
            .get(domain)
            .ok_or_else(|| CrossDomainError::UnknownDomain(domain.clone()))?;
        debug!(domain = %domain, operation, "cross-domain call");

        match operation {
            GET_VERIFIER_OPERATION => Self::get_verifier(ledger.as_ref(), args).await,
            other => Err(CrossDomainError::UnsupportedOperation {
                domain: domain.clone(),
                operation: other.to_string(),
            }),
        }
    }
}
