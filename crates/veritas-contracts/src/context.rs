//! Per-operation execution context

use chrono::Utc;
use std::sync::Arc;
use veritas_core::{
    resolve_invoker_id, CrossDomainEffects, Credential, IdentityId, LedgerEffects, Timestamp,
    TransactionId, VeritasConfig, VeritasError, VeritasResult,
};
use veritas_records::{RecordStore, SnapshotPolicy};

/// Everything one contract operation may touch
///
/// Built fresh for every invocation: the credential and transaction belong
/// to a single call.
#[derive(Clone)]
pub struct ContractContext {
    ledger: Arc<dyn LedgerEffects>,
    credential: Credential,
    cross_domain: Option<Arc<dyn CrossDomainEffects>>,
    config: Arc<VeritasConfig>,
    now: Timestamp,
}

impl ContractContext {
    /// Context with default configuration and no cross-domain route
    pub fn new(ledger: Arc<dyn LedgerEffects>, credential: Credential) -> Self {
        Self {
            ledger,
            credential,
            cross_domain: None,
            config: Arc::new(VeritasConfig::default()),
            now: Utc::now(),
        }
    }

    /// Use `config` instead of the defaults
    pub fn with_config(mut self, config: Arc<VeritasConfig>) -> Self {
        self.config = config;
        self
    }

    /// Route cross-domain calls through `router`
    pub fn with_cross_domain(mut self, router: Arc<dyn CrossDomainEffects>) -> Self {
        self.cross_domain = Some(router);
        self
    }

    /// Evaluate expiry against `now` instead of the wall clock
    pub fn with_time(mut self, now: Timestamp) -> Self {
        self.now = now;
        self
    }

    pub fn ledger(&self) -> &dyn LedgerEffects {
        self.ledger.as_ref()
    }

    /// Typed record access on the local ledger
    pub fn store(&self) -> RecordStore<'_> {
        RecordStore::new(self.ledger.as_ref())
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn config(&self) -> &VeritasConfig {
        &self.config
    }

    pub fn cross_domain(&self) -> Option<&dyn CrossDomainEffects> {
        self.cross_domain.as_deref()
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn tx_id(&self) -> TransactionId {
        self.ledger.transaction_id()
    }

    /// Stable ID of the caller; fails closed
    pub fn invoker(&self) -> VeritasResult<IdentityId> {
        resolve_invoker_id(&self.credential)
    }

    /// Snapshot handling for repeat verifications
    pub fn snapshot_policy(&self) -> SnapshotPolicy {
        SnapshotPolicy::from_refresh_flag(self.config.refresh_snapshot_on_reverify)
    }

    /// Cross-domain route, required when the registry lives elsewhere
    pub(crate) fn require_cross_domain(&self) -> VeritasResult<&dyn CrossDomainEffects> {
        self.cross_domain().ok_or_else(|| {
            VeritasError::config("verifier registry is remote but no cross-domain route is set")
        })
    }
}
