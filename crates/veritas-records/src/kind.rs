//! Record kinds and their storage keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every kind of record persisted on the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    User,
    Verifier,
    Document,
    Eform,
    Asset,
    Share,
}

impl RecordKind {
    /// All kinds, in a fixed order
    pub const ALL: [RecordKind; 6] = [
        RecordKind::User,
        RecordKind::Verifier,
        RecordKind::Document,
        RecordKind::Eform,
        RecordKind::Asset,
        RecordKind::Share,
    ];

    /// Value of the `docType` envelope field
    pub fn doc_type(self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Verifier => "verifier",
            RecordKind::Document => "document",
            RecordKind::Eform => "eform",
            RecordKind::Asset => "digitalAsset",
            RecordKind::Share => "documentShare",
        }
    }

    /// Key namespace; distinct per kind so IDs from one kind never collide
    /// with another
    pub fn namespace(self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Verifier => "verifier",
            RecordKind::Document => "document",
            RecordKind::Eform => "eform",
            RecordKind::Asset => "asset",
            RecordKind::Share => "share",
        }
    }

    /// Human-readable name used in messages
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Verifier => "verifier",
            RecordKind::Document => "document",
            RecordKind::Eform => "eform",
            RecordKind::Asset => "digital asset",
            RecordKind::Share => "document share",
        }
    }

    /// Storage key for the record with `id`
    pub fn storage_key(self, id: &str) -> String {
        format!("{}:{}", self.namespace(), id)
    }

    /// Split a storage key back into kind and ID
    pub fn parse_key(key: &str) -> Option<(RecordKind, &str)> {
        let (namespace, id) = key.split_once(':')?;
        Self::ALL
            .into_iter()
            .find(|kind| kind.namespace() == namespace)
            .map(|kind| (kind, id))
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
