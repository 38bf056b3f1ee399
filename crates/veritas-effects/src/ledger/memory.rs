//! In-memory ledger handler for testing

use super::{random_transaction_id, TransactionSlot};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use veritas_core::{LedgerEffects, LedgerEntry, LedgerError, Selector, TransactionId};

/// In-memory ledger handler for testing
///
/// Writes are visible immediately; there is no commit step. Clones share
/// the same state.
#[derive(Debug, Clone)]
pub struct MemoryLedgerHandler {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    tx: Arc<TransactionSlot>,
}

impl MemoryLedgerHandler {
    /// Create an empty ledger with a random transaction ID
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            tx: Arc::new(TransactionSlot::random()),
        }
    }

    /// Start the next operation under `id`
    pub fn begin_transaction(&self, id: impl Into<TransactionId>) {
        self.tx.set(id.into());
    }

    /// Start the next operation under a fresh random ID and return it
    pub fn begin_random_transaction(&self) -> TransactionId {
        let id = random_transaction_id();
        self.tx.set(id.clone());
        id
    }

    /// Copy of every stored key and value
    pub async fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.data.read().await.clone()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

impl Default for MemoryLedgerHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerEffects for MemoryLedgerHandler {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::InvalidKey {
                reason: "key cannot be empty".to_string(),
            });
        }
        let mut data = self.data.write().await;
        data.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete_state(&self, key: &str) -> Result<(), LedgerError> {
        let mut data = self.data.write().await;
        data.remove(key);
        Ok(())
    }

    async fn query_state(&self, selector: &Selector) -> Result<Vec<LedgerEntry>, LedgerError> {
        let data = self.data.read().await;
        Ok(data
            .iter()
            .filter(|(_, value)| selector.matches_bytes(value))
            .map(|(key, value)| LedgerEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    fn transaction_id(&self) -> TransactionId {
        self.tx.get()
    }
}
