//! Typed record access over the ledger effect
//!
//! [`RecordStore`] is the only place that turns storage keys and raw bytes
//! into records. Adapter failures are wrapped into
//! [`VeritasError::Storage`] with the operation context attached; the
//! adapter message itself is kept verbatim.

use crate::codec::{self, FixedKind, Record, DOC_TYPE_FIELD};
use crate::kind::RecordKind;
use tracing::debug;
use veritas_core::{LedgerEffects, LedgerError, Selector, VeritasError, VeritasResult};

/// Borrowing view of a ledger that reads and writes whole records
#[derive(Clone, Copy)]
pub struct RecordStore<'a> {
    ledger: &'a dyn LedgerEffects,
}

fn storage_error(context: String, err: LedgerError) -> VeritasError {
    VeritasError::storage(context, err.to_string())
}

impl<'a> RecordStore<'a> {
    pub fn new(ledger: &'a dyn LedgerEffects) -> Self {
        Self { ledger }
    }

    /// Underlying ledger
    pub fn ledger(&self) -> &'a dyn LedgerEffects {
        self.ledger
    }

    /// Load the record of `kind` stored under `id`, if any
    pub async fn load<R: Record>(&self, kind: RecordKind, id: &str) -> VeritasResult<Option<R>> {
        let key = kind.storage_key(id);
        let bytes = self
            .ledger
            .get_state(&key)
            .await
            .map_err(|e| storage_error(format!("reading {kind} {id}"), e))?;

        let Some(bytes) = bytes else {
            debug!(key = %key, "record absent");
            return Ok(None);
        };

        let record: R = codec::decode(kind, &bytes)?;
        if record.record_id() != id {
            return Err(VeritasError::schema_mismatch(format!(
                "{kind} stored under {key} declares id {}",
                record.record_id()
            )));
        }
        Ok(Some(record))
    }

    /// Load a record that must exist
    pub async fn require<R: Record>(&self, kind: RecordKind, id: &str) -> VeritasResult<R> {
        self.load(kind, id)
            .await?
            .ok_or_else(|| VeritasError::not_found(kind.label(), id))
    }

    /// Load a fixed-kind record, if any
    pub async fn get<R: FixedKind>(&self, id: &str) -> VeritasResult<Option<R>> {
        self.load(R::KIND, id).await
    }

    /// Load a fixed-kind record that must exist
    pub async fn fetch<R: FixedKind>(&self, id: &str) -> VeritasResult<R> {
        self.require(R::KIND, id).await
    }

    /// Whether any value is stored for `kind` and `id`
    ///
    /// Checks presence only; the value is not decoded.
    pub async fn exists(&self, kind: RecordKind, id: &str) -> VeritasResult<bool> {
        self.ledger
            .get_state(&kind.storage_key(id))
            .await
            .map(|bytes| bytes.is_some())
            .map_err(|e| storage_error(format!("reading {kind} {id}"), e))
    }

    /// Fail with `AlreadyExists` when a record is stored for `kind` and `id`
    pub async fn ensure_absent(&self, kind: RecordKind, id: &str) -> VeritasResult<()> {
        if self.exists(kind, id).await? {
            return Err(VeritasError::already_exists(kind.label(), id));
        }
        Ok(())
    }

    /// Encode and write a record under its own ID
    pub async fn save<R: Record>(&self, kind: RecordKind, record: &R) -> VeritasResult<()> {
        let id = record.record_id();
        let key = kind.storage_key(id);
        let bytes = codec::encode(kind, record)?;
        debug!(key = %key, bytes = bytes.len(), "writing record");
        self.ledger
            .put_state(&key, bytes)
            .await
            .map_err(|e| storage_error(format!("writing {kind} {id}"), e))
    }

    /// Write a fixed-kind record
    pub async fn put<R: FixedKind>(&self, record: &R) -> VeritasResult<()> {
        self.save(R::KIND, record).await
    }

    /// Remove the record of `kind` stored under `id`
    pub async fn delete(&self, kind: RecordKind, id: &str) -> VeritasResult<()> {
        debug!(key = %kind.storage_key(id), "deleting record");
        self.ledger
            .delete_state(&kind.storage_key(id))
            .await
            .map_err(|e| storage_error(format!("deleting {kind} {id}"), e))
    }

    /// Records of `kind` matching `selector`, in key order
    ///
    /// A matching value that no longer decodes fails the whole query with
    /// `SchemaMismatch`.
    pub async fn query<R: Record>(
        &self,
        kind: RecordKind,
        selector: Selector,
    ) -> VeritasResult<Vec<R>> {
        let selector = selector.eq(DOC_TYPE_FIELD, kind.doc_type());
        let entries = self
            .ledger
            .query_state(&selector)
            .await
            .map_err(|e| storage_error(format!("querying {kind} records"), e))?;
        debug!(kind = %kind, hits = entries.len(), "query evaluated");

        entries
            .iter()
            .map(|entry| codec::decode(kind, &entry.value))
            .collect()
    }

    /// Fixed-kind query
    pub async fn find<R: FixedKind>(&self, selector: Selector) -> VeritasResult<Vec<R>> {
        self.query(R::KIND, selector).await
    }
}
