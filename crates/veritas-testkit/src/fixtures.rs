//! Contract harness over an in-memory ledger

use serde_json::Value;
use std::sync::Arc;
use veritas_contracts::{ContractContext, ContractRuntime, Response};
use veritas_core::{Credential, LedgerEffects, VeritasConfig, DEFAULT_ROLE_ATTRIBUTE};
use veritas_effects::MemoryLedgerHandler;
use veritas_records::{RecordStore, Verifier};

/// Subject DN for a test identity
pub fn subject(name: &str) -> String {
    format!("CN={name},OU=client,O=Veritas Test")
}

/// Credential for an ordinary user
pub fn user_credential(name: &str) -> Credential {
    Credential::new(subject(name))
}

/// Credential carrying the verifier role attribute
pub fn verifier_credential(name: &str) -> Credential {
    Credential::new(subject(name)).with_attribute(DEFAULT_ROLE_ATTRIBUTE, "true")
}

/// Memory ledger plus a runtime bound to it
pub struct Harness {
    pub ledger: MemoryLedgerHandler,
    pub runtime: ContractRuntime,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(VeritasConfig::default())
    }

    pub fn with_config(config: VeritasConfig) -> Self {
        let ledger = MemoryLedgerHandler::new();
        let runtime = ContractRuntime::new(Arc::new(ledger.clone()), config);
        Self { ledger, runtime }
    }

    /// Shared handle to the ledger, e.g. for a cross-domain router
    pub fn ledger_arc(&self) -> Arc<dyn LedgerEffects> {
        Arc::new(self.ledger.clone())
    }

    pub fn store(&self) -> RecordStore<'_> {
        RecordStore::new(&self.ledger)
    }

    /// Context for `credential` in a fresh transaction
    pub fn ctx(&self, credential: Credential) -> ContractContext {
        self.ledger.begin_random_transaction();
        self.runtime.context(credential)
    }

    /// Invoke by name in a fresh transaction
    pub async fn invoke(
        &self,
        credential: Credential,
        operation: &str,
        args: Vec<Value>,
    ) -> Response<Value> {
        self.ledger.begin_random_transaction();
        self.runtime.invoke(credential, operation, args).await
    }

    /// Invoke under a chosen transaction ID
    pub async fn invoke_in(
        &self,
        tx_id: &str,
        credential: Credential,
        operation: &str,
        args: Vec<Value>,
    ) -> Response<Value> {
        self.ledger.begin_transaction(tx_id);
        self.runtime.invoke(credential, operation, args).await
    }

    /// Register `name` as a user; panics on failure
    pub async fn register_user(&self, name: &str) {
        let response = self.invoke(user_credential(name), "CreateUser", vec![]).await;
        assert!(response.success, "CreateUser {name}: {}", response.message);
    }

    /// Register `name` as a verifier; panics on failure
    pub async fn register_verifier(&self, name: &str, grade: &str) -> Verifier {
        let response = self
            .invoke(
                verifier_credential(name),
                "CreateVerifier",
                vec![Value::from(format!("{name} office")), Value::from(grade)],
            )
            .await;
        assert!(response.success, "CreateVerifier {name}: {}", response.message);
        serde_json::from_value(response.data.expect("verifier data")).expect("verifier json")
    }

    /// Raw bytes currently stored under `key`
    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.ledger.get_state(key).await.expect("memory ledger read")
    }
}
