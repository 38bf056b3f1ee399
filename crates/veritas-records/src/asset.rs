//! Ownership and linking rules for digital assets

use crate::codec::{FixedKind, Record};
use crate::kind::RecordKind;
use crate::verification::{Verifiable, Verification};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use veritas_core::{IdentityId, TransactionId, VeritasError, VeritasResult};

/// Transferable, owned record
///
/// `owner` changes only through [`DigitalAsset::transfer`], which is gated
/// on the current owner. Linked document IDs are pointers by convention:
/// nothing checks that the referenced document exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalAsset {
    /// Transaction ID of the registering transaction
    pub id: String,
    /// Free-form asset type, e.g. "deed"
    pub asset_type: String,
    /// Current owner
    pub owner: IdentityId,
    /// Caller-supplied attributes
    pub metadata: BTreeMap<String, String>,
    /// Linked document IDs, no duplicates, in link order
    pub linked_document_ids: Vec<String>,
    /// Verification list, one entry per verifier
    pub verifications: Vec<Verification>,
    /// Free-form description
    pub description: String,
}

impl DigitalAsset {
    /// New asset owned by `owner`, keyed by the registering transaction
    pub fn register(
        tx_id: &TransactionId,
        owner: IdentityId,
        asset_type: impl Into<String>,
        metadata: BTreeMap<String, String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: tx_id.as_str().to_string(),
            asset_type: asset_type.into(),
            owner,
            metadata,
            linked_document_ids: Vec::new(),
            verifications: Vec::new(),
            description: description.into(),
        }
    }

    /// Fail with `NotOwner` unless `invoker` owns the asset
    pub fn ensure_owner(&self, invoker: &IdentityId) -> VeritasResult<()> {
        if &self.owner == invoker {
            Ok(())
        } else {
            Err(VeritasError::not_owner(&self.id, invoker.as_str()))
        }
    }

    /// Hand the asset to `new_owner`; returns the previous owner
    ///
    /// `new_owner` need not be a registered identity.
    pub fn transfer(
        &mut self,
        invoker: &IdentityId,
        new_owner: IdentityId,
    ) -> VeritasResult<IdentityId> {
        self.ensure_owner(invoker)?;
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }

    /// Whether `document_id` is already linked
    pub fn is_linked(&self, document_id: &str) -> bool {
        self.linked_document_ids.iter().any(|d| d == document_id)
    }

    /// Append a document link; owner only, duplicates rejected
    pub fn link_document(
        &mut self,
        invoker: &IdentityId,
        document_id: impl Into<String>,
    ) -> VeritasResult<()> {
        self.ensure_owner(invoker)?;
        let document_id = document_id.into();
        if self.is_linked(&document_id) {
            return Err(VeritasError::already_linked(&self.id, document_id));
        }
        self.linked_document_ids.push(document_id);
        Ok(())
    }
}

impl Record for DigitalAsset {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl FixedKind for DigitalAsset {
    const KIND: RecordKind = RecordKind::Asset;
}

impl Verifiable for DigitalAsset {
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
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn asset(owner: &str) -> DigitalAsset {
        DigitalAsset::register(
            &TransactionId::new("tx-1"),
            IdentityId::new(owner),
            "deed",
            BTreeMap::new(),
            "lot 7",
        )
    }

    #[test]
    fn registration_uses_transaction_id() {
        let asset = asset("alice");
        assert_eq!(asset.id, "tx-1");
        assert_eq!(asset.owner, IdentityId::new("alice"));
        assert!(asset.linked_document_ids.is_empty());
    }

    #[test]
    fn only_owner_may_transfer() {
        let mut asset = asset("alice");
        let bob = IdentityId::new("bob");

        assert_matches!(
            asset.transfer(&bob, bob.clone()),
            Err(VeritasError::NotOwner { invoker, .. }) if invoker == "bob"
        );
        assert_eq!(asset.owner, IdentityId::new("alice"));

        let previous = asset.transfer(&IdentityId::new("alice"), bob.clone()).unwrap();
        assert_eq!(previous, IdentityId::new("alice"));
        assert_eq!(asset.owner, bob);
    }

    #[test]
    fn linking_twice_is_rejected() {
        let mut asset = asset("alice");
        let alice = IdentityId::new("alice");
        asset.link_document(&alice, "doc1").unwrap();
        assert_matches!(
            asset.link_document(&alice, "doc1"),
            Err(VeritasError::AlreadyLinked { document_id, .. }) if document_id == "doc1"
        );
        assert_eq!(asset.linked_document_ids, vec!["doc1".to_string()]);
    }

    #[test]
    fn non_owner_cannot_link() {
        let mut asset = asset("alice");
        assert_matches!(
            asset.link_document(&IdentityId::new("mallory"), "doc1"),
            Err(VeritasError::NotOwner { .. })
        );
        assert!(!asset.is_linked("doc1"));
    }

    proptest! {
        #[test]
        fn transfer_by_non_owner_leaves_owner(owner in "[a-z]{1,8}", intruder in "[a-z]{1,8}") {
            prop_assume!(owner != intruder);
            let mut asset = asset(&owner);
            let intruder = IdentityId::new(intruder);
            prop_assert!(asset.transfer(&intruder, intruder.clone()).is_err());
            prop_assert_eq!(asset.owner, IdentityId::new(owner));
        }

        #[test]
        fn links_never_repeat(docs in prop::collection::vec("[a-c]", 0..12)) {
            let mut asset = asset("alice");
            let alice = IdentityId::new("alice");
            for doc in &docs {
                let was_linked = asset.is_linked(doc);
                let result = asset.link_document(&alice, doc.clone());
                prop_assert_eq!(result.is_err(), was_linked);
            }
            let mut sorted = asset.linked_document_ids.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), asset.linked_document_ids.len());
        }
    }
}
