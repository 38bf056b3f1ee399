//! Documents and e-forms
//!
//! Both kinds share one record shape and one set of rules: append-only
//! signatures, upsert-by-verifier verifications, and an owner fixed at
//! creation. Only the key namespace differs.

use crate::codec::Record;
use crate::kind::RecordKind;
use crate::signature::{Signable, Signature};
use crate::verification::{Verifiable, Verification};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use veritas_core::{IdentityId, VeritasError};

/// Which document-like record a contract operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Document,
    Eform,
}

impl DocumentKind {
    /// Storage kind
    pub fn record_kind(self) -> RecordKind {
        match self {
            DocumentKind::Document => RecordKind::Document,
            DocumentKind::Eform => RecordKind::Eform,
        }
    }

    /// Name used in operation names (`SignDocument`, `SignEform`)
    pub fn operation_suffix(self) -> &'static str {
        match self {
            DocumentKind::Document => "Document",
            DocumentKind::Eform => "Eform",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.record_kind().label())
    }
}

impl FromStr for DocumentKind {
    type Err = VeritasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" | "Document" => Ok(DocumentKind::Document),
            "eform" | "Eform" => Ok(DocumentKind::Eform),
            other => Err(VeritasError::invalid_argument(format!(
                "unknown document kind {other}"
            ))),
        }
    }
}

/// Document or e-form record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Document {
    /// Unique ID chosen by the creator
    pub id: String,
    /// Hashes of the content, in supplied order
    pub content_hashes: Vec<String>,
    /// Append-only signature log
    pub signatures: Vec<Signature>,
    /// Creator; never transferred
    pub owner: IdentityId,
    /// Verification list, one entry per verifier
    pub verifications: Vec<Verification>,
}

impl Document {
    /// New unsigned, unverified record
    pub fn new(id: impl Into<String>, content_hashes: Vec<String>, owner: IdentityId) -> Self {
        Self {
            id: id.into(),
            content_hashes,
            signatures: Vec::new(),
            owner,
            verifications: Vec::new(),
        }
    }
}

impl Record for Document {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Signable for Document {
    fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    fn signatures_mut(&mut self) -> &mut Vec<Signature> {
        &mut self.signatures
    }
}

impl Verifiable for Document {
    fn verifications(&self) -> &[Verification] {
        &self.verifications
    }

    fn verifications_mut(&mut self) -> &mut Vec<Verification> {
        &mut self.verifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_core::parse_instant;

    #[test]
    fn resigning_appends() {
        let mut doc = Document::new("d1", vec!["h".into()], IdentityId::new("alice"));
        for when in ["2030-01-01T00:00:00Z", "2030-01-02T00:00:00Z"] {
            doc.append_signature(Signature {
                hash: "sig".into(),
                otp: "1234".into(),
                signer: IdentityId::new("alice"),
                timestamp: parse_instant(when).unwrap(),
            });
        }
        assert_eq!(doc.signatures.len(), 2);
        assert!(doc.signed_with("sig"));
        assert!(!doc.signed_with("other"));
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("Eform".parse::<DocumentKind>().unwrap(), DocumentKind::Eform);
        assert!("asset".parse::<DocumentKind>().is_err());
        assert_eq!(DocumentKind::Document.record_kind(), RecordKind::Document);
    }
}
