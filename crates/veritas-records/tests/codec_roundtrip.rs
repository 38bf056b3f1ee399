//! Encoding is stable: encode(decode(encode(x))) == encode(x) for every kind

use proptest::prelude::*;
use std::collections::BTreeMap;
use veritas_core::IdentityId;
use veritas_records::{
    decode, decode_fixed, encode, encode_fixed, DigitalAsset, Document, DocumentKind,
    DocumentShare, FixedKind, RecordKind, User,
};
use veritas_testkit::strategies::{
    arb_identity, arb_signature, arb_text, arb_verification, arb_verifier,
};

fn user() -> impl Strategy<Value = User> {
    (
        arb_identity(),
        prop::collection::btree_map(
            arb_text(),
            prop::collection::vec(arb_verification(), 0..3),
            0..4,
        ),
    )
        .prop_map(|(id, profile_verifications)| User {
            id,
            profile_verifications,
        })
}

fn document() -> impl Strategy<Value = Document> {
    (
        "[a-z0-9-]{1,12}",
        prop::collection::vec(arb_text(), 0..4),
        prop::collection::vec(arb_signature(), 0..3),
        arb_identity(),
        prop::collection::vec(arb_verification(), 0..3),
    )
        .prop_map(|(id, content_hashes, signatures, owner, verifications)| Document {
            id,
            content_hashes,
            signatures,
            owner,
            verifications,
        })
}

fn asset() -> impl Strategy<Value = DigitalAsset> {
    (
        "[a-f0-9]{8,16}",
        arb_text(),
        arb_identity(),
        prop::collection::btree_map(arb_text(), arb_text(), 0..5),
        prop::collection::vec("[a-z0-9]{1,6}", 0..4),
        prop::collection::vec(arb_verification(), 0..3),
        arb_text(),
    )
        .prop_map(
            |(id, asset_type, owner, metadata, linked_document_ids, verifications, description)| {
                DigitalAsset {
                    id,
                    asset_type,
                    owner,
                    metadata,
                    linked_document_ids,
                    verifications,
                    description,
                }
            },
        )
}

fn share() -> impl Strategy<Value = DocumentShare> {
    (
        "[a-z0-9]{1,8}",
        arb_identity(),
        prop::collection::vec(arb_identity(), 1..4),
        "[a-z0-9]{1,8}",
        prop_oneof![Just(DocumentKind::Document), Just(DocumentKind::Eform)],
    )
        .prop_map(|(id, sender, recipients, document_id, document_kind)| DocumentShare {
            id,
            sender,
            recipients,
            document_id,
            document_kind,
        })
}

fn assert_stable<R>(record: &R) -> Result<(), TestCaseError>
where
    R: FixedKind + PartialEq + std::fmt::Debug,
{
    let first = encode_fixed(record).map_err(|e| TestCaseError::fail(e.to_string()))?;
    let decoded: R = decode_fixed(&first).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(&decoded, record);
    let second = encode_fixed(&decoded).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(first, second);
    Ok(())
}

proptest! {
    #[test]
    fn user_is_stable(record in user()) {
        assert_stable(&record)?;
    }

    #[test]
    fn verifier_is_stable(record in arb_verifier()) {
        assert_stable(&record)?;
    }

    #[test]
    fn asset_is_stable(record in asset()) {
        assert_stable(&record)?;
    }

    #[test]
    fn share_is_stable(record in share()) {
        assert_stable(&record)?;
    }

    #[test]
    fn document_and_eform_are_stable(record in document()) {
        for kind in [RecordKind::Document, RecordKind::Eform] {
            let first = encode(kind, &record).unwrap();
            let decoded: Document = decode(kind, &first).unwrap();
            prop_assert_eq!(&decoded, &record);
            prop_assert_eq!(encode(kind, &decoded).unwrap(), first);
        }
    }
}

#[test]
fn empty_collections_and_non_ascii_metadata() {
    let mut metadata = BTreeMap::new();
    metadata.insert("städte".to_string(), "Zürich – 東京".to_string());
    let asset = DigitalAsset {
        id: "tx-0".into(),
        asset_type: "deed".into(),
        owner: IdentityId::new("alice"),
        metadata,
        linked_document_ids: vec![],
        verifications: vec![],
        description: "lot 7".into(),
    };
    let bytes = encode_fixed(&asset).unwrap();
    assert_eq!(encode_fixed(&decode_fixed::<DigitalAsset>(&bytes).unwrap()).unwrap(), bytes);

    let user = User::new("bob");
    let bytes = encode_fixed(&user).unwrap();
    assert_eq!(decode_fixed::<User>(&bytes).unwrap(), user);
}

#[test]
fn document_bytes_do_not_decode_as_eform() {
    let doc = Document::new("d1", vec!["h".into()], IdentityId::new("alice"));
    let bytes = encode(RecordKind::Document, &doc).unwrap();
    assert!(decode::<Document>(RecordKind::Eform, &bytes).is_err());
}
