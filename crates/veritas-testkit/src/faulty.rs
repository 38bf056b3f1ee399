//! Ledger wrapper that injects adapter failures

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use veritas_core::{LedgerEffects, LedgerEntry, LedgerError, Selector, TransactionId};

/// Which calls fail
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultPlan {
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub fail_deletes: bool,
    pub fail_queries: bool,
    /// Only keys starting with this prefix are affected, when set
    pub key_prefix: Option<String>,
}

impl FaultPlan {
    pub fn writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::default()
        }
    }

    pub fn queries() -> Self {
        Self {
            fail_queries: true,
            ..Self::default()
        }
    }

    pub fn reads_of(prefix: impl Into<String>) -> Self {
        Self {
            fail_reads: true,
            key_prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    fn applies_to(&self, key: &str) -> bool {
        self.key_prefix
            .as_deref()
            .map_or(true, |prefix| key.starts_with(prefix))
    }
}

/// Wraps a ledger and fails the calls selected by the current [`FaultPlan`]
pub struct FaultyLedger {
    inner: Arc<dyn LedgerEffects>,
    plan: Mutex<FaultPlan>,
}

impl FaultyLedger {
    pub fn new(inner: Arc<dyn LedgerEffects>) -> Self {
        Self {
            inner,
            plan: Mutex::new(FaultPlan::default()),
        }
    }

    pub fn set_plan(&self, plan: FaultPlan) {
        *self.plan.lock() = plan;
    }

    pub fn heal(&self) {
        self.set_plan(FaultPlan::default());
    }
}

#[async_trait]
impl LedgerEffects for FaultyLedger {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let fail = {
            let plan = self.plan.lock();
            plan.fail_reads && plan.applies_to(key)
        };
        if fail {
            return Err(LedgerError::ReadFailed(format!("injected read fault on {key}")));
        }
        self.inner.get_state(key).await
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        let fail = {
            let plan = self.plan.lock();
            plan.fail_writes && plan.applies_to(key)
        };
        if fail {
            return Err(LedgerError::WriteFailed(format!("injected write fault on {key}")));
        }
        self.inner.put_state(key, value).await
    }

    async fn delete_state(&self, key: &str) -> Result<(), LedgerError> {
        let fail = {
            let plan = self.plan.lock();
            plan.fail_deletes && plan.applies_to(key)
        };
        if fail {
            return Err(LedgerError::DeleteFailed(format!("injected delete fault on {key}")));
        }
        self.inner.delete_state(key).await
    }

    async fn query_state(&self, selector: &Selector) -> Result<Vec<LedgerEntry>, LedgerError> {
        if self.plan.lock().fail_queries {
            return Err(LedgerError::QueryFailed("injected query fault".to_string()));
        }
        self.inner.query_state(selector).await
    }

    fn transaction_id(&self) -> TransactionId {
        self.inner.transaction_id()
    }
}
