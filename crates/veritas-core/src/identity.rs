//! Caller credentials
//!
//! The platform hands each transaction an opaque credential: the subject
//! distinguished name of the caller's certificate plus optional attributes
//! embedded by the issuing authority. This module turns that material into a
//! stable [`IdentityId`] and reads the verifier capability attribute.
//!
//! Parsing fails closed. A subject without exactly one non-empty common name
//! is an [`VeritasError::Identity`], never an empty or default identity.

use crate::errors::{Result, VeritasError};
use crate::identifiers::IdentityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default name of the capability attribute carrying verifier privilege
pub const DEFAULT_ROLE_ATTRIBUTE: &str = "isVerifier";

/// Credential material presented by the invoker
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credential {
    /// Subject distinguished name, e.g. `CN=alice,OU=client,O=Org1`
    pub subject: String,
    /// Attributes embedded in the credential
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Credential {
    /// Credential with a subject and no attributes
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Read an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Extract the invoker's stable ID (the subject common name)
pub fn resolve_invoker_id(credential: &Credential) -> Result<IdentityId> {
    let mut common_name: Option<String> = None;

    for rdn in split_unescaped(&credential.subject, ',') {
        let rdn = rdn.trim();
        if rdn.is_empty() {
            continue;
        }
        let (attr, value) = rdn
            .split_once('=')
            .ok_or_else(|| VeritasError::identity(format!("malformed subject component {rdn:?}")))?;
        if !attr.trim().eq_ignore_ascii_case("CN") {
            continue;
        }
        if common_name.is_some() {
            return Err(VeritasError::identity("subject carries more than one CN"));
        }
        let value = unescape(value.trim());
        if value.is_empty() {
            return Err(VeritasError::identity("subject CN is empty"));
        }
        common_name = Some(value);
    }

    common_name
        .map(IdentityId::new)
        .ok_or_else(|| VeritasError::identity("subject has no CN component"))
}

/// Whether the credential carries the verifier capability attribute
///
/// Independent of ledger state. Only the literal value `"true"` grants the
/// role.
pub fn is_verifier_role(credential: &Credential, attribute: &str) -> bool {
    credential.attribute(attribute) == Some("true")
}

fn split_unescaped(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == sep {
            parts.push(&input[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn resolves_common_name() {
        let cred = Credential::new("CN=alice,OU=client,O=Org1");
        assert_eq!(resolve_invoker_id(&cred).unwrap(), "alice");
    }

    #[test]
    fn handles_escaped_commas_and_case() {
        let cred = Credential::new("ou=client, cn=Doe\\, Jane ,O=Org1");
        assert_eq!(resolve_invoker_id(&cred).unwrap(), "Doe, Jane");
    }

    #[test]
    fn fails_closed() {
        for subject in ["", "OU=client", "CN=", "CN=a,CN=b", "garbage"] {
            assert_matches!(
                resolve_invoker_id(&Credential::new(subject)),
                Err(VeritasError::Identity { .. }),
                "subject {subject:?} should be rejected"
            );
        }
    }

    #[test]
    fn role_attribute_requires_literal_true() {
        let cred = Credential::new("CN=v1");
        assert!(!is_verifier_role(&cred, DEFAULT_ROLE_ATTRIBUTE));
        let cred = cred.with_attribute(DEFAULT_ROLE_ATTRIBUTE, "yes");
        assert!(!is_verifier_role(&cred, DEFAULT_ROLE_ATTRIBUTE));
        let cred = cred.with_attribute(DEFAULT_ROLE_ATTRIBUTE, "true");
        assert!(is_verifier_role(&cred, DEFAULT_ROLE_ATTRIBUTE));
    }
}
