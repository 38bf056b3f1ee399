//! Document sharing events

use crate::codec::{FixedKind, Record};
use crate::document::DocumentKind;
use crate::kind::RecordKind;
use serde::{Deserialize, Serialize};
use veritas_core::IdentityId;

/// Write-once record of a document being shared
///
/// Not referenced back from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DocumentShare {
    /// Share ID chosen by the sender
    pub id: String,
    /// Invoker who shared
    pub sender: IdentityId,
    /// Recipients, in supplied order
    pub recipients: Vec<IdentityId>,
    /// Shared document or e-form
    pub document_id: String,
    /// Kind of the shared record
    pub document_kind: DocumentKind,
}

impl Record for DocumentShare {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl FixedKind for DocumentShare {
    const KIND: RecordKind = RecordKind::Share;
}
