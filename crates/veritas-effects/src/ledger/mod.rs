//! Ledger handler implementations

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemLedgerHandler;
pub use memory::MemoryLedgerHandler;

use parking_lot::RwLock;
use veritas_core::TransactionId;

/// Transaction ID slot shared by the handlers
///
/// The platform assigns one ID per transaction. Handlers outside a platform
/// are reused across operations, so the caller sets the ID before each one.
#[derive(Debug)]
pub(crate) struct TransactionSlot(RwLock<TransactionId>);

impl TransactionSlot {
    pub(crate) fn random() -> Self {
        Self(RwLock::new(random_transaction_id()))
    }

    pub(crate) fn get(&self) -> TransactionId {
        self.0.read().clone()
    }

    pub(crate) fn set(&self, id: TransactionId) {
        *self.0.write() = id;
    }
}

pub(crate) fn random_transaction_id() -> TransactionId {
    TransactionId::new(uuid::Uuid::new_v4().simple().to_string())
}
