//! Key/value ledger effect trait

use crate::identifiers::TransactionId;
use crate::selector::Selector;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Ledger adapter failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum LedgerError {
    /// Reading a key failed
    #[error("read failed: {0}")]
    ReadFailed(String),
    /// Writing a key failed
    #[error("write failed: {0}")]
    WriteFailed(String),
    /// Deleting a key failed
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    /// Rich query failed
    #[error("query failed: {0}")]
    QueryFailed(String),
    /// Key rejected by the adapter
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },
}

/// A key and its raw stored value, as returned by queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Storage key
    pub key: String,
    /// Raw stored bytes
    pub value: Vec<u8>,
}

/// Transactional key/value ledger, scoped to one transaction
///
/// All calls return within the enclosing transaction. Writes become visible
/// to other transactions only when the platform commits; concurrent
/// read-then-write conflicts on a key are resolved by the platform's commit
/// protocol, not by callers.
#[async_trait]
pub trait LedgerEffects: Send + Sync {
    /// Read the value stored under `key`
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Store `value` under `key`, replacing any previous value
    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Remove `key`; removing an absent key is not an error
    async fn delete_state(&self, key: &str) -> Result<(), LedgerError>;

    /// Every stored entry whose JSON form satisfies `selector`, in key order
    async fn query_state(&self, selector: &Selector) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Unique identifier of the enclosing transaction
    fn transaction_id(&self) -> TransactionId;
}
