//! One verification per verifier, refreshed in place

use assert_matches::assert_matches;
use proptest::prelude::*;
use serde_json::json;
use veritas_contracts::DocumentContract;
use veritas_core::{parse_instant, ErrorCode, IdentityId, VeritasConfig, VeritasError};
use veritas_records::{Document, DocumentKind};
use veritas_testkit::strategies::{arb_bad_date, arb_identity_name, arb_rfc3339};
use veritas_testkit::{init_test_tracing, user_credential, verifier_credential, Harness};

async fn harness_with_d1(config: VeritasConfig) -> Harness {
    let h = Harness::with_config(config);
    h.register_user("alice").await;
    h.register_verifier("v1", "A").await;
    let created = h
        .invoke(user_credential("alice"), "CreateDocument", vec![json!("d1"), json!(["h1"])])
        .await;
    assert!(created.success, "{}", created.message);
    h
}

fn doc(data: Option<serde_json::Value>) -> Document {
    serde_json::from_value(data.expect("document data")).expect("document json")
}

#[tokio::test]
async fn repeat_verification_refreshes_expiry() {
    init_test_tracing();
    let h = harness_with_d1(VeritasConfig::default()).await;
    let v1 = verifier_credential("v1");

    let first = h
        .invoke(v1.clone(), "VerifyDocument", vec![json!("d1"), json!("2030-01-01T00:00:00Z")])
        .await;
    assert!(first.success, "{}", first.message);
    assert_eq!(doc(first.data).verifications.len(), 1);

    let second = h
        .invoke(v1.clone(), "VerifyDocument", vec![json!("d1"), json!("2031-01-01T00:00:00Z")])
        .await;
    let document = doc(second.data);
    assert_eq!(document.verifications.len(), 1);
    assert_eq!(
        document.verifications[0].expiry,
        parse_instant("2031-01-01T00:00:00Z").unwrap()
    );

    let removed = h
        .invoke(v1.clone(), "RemoveDocumentVerification", vec![json!("d1")])
        .await;
    assert!(removed.success);
    assert!(doc(removed.data).verifications.is_empty());

    let again = h
        .invoke(v1, "RemoveDocumentVerification", vec![json!("d1")])
        .await;
    assert_eq!(again.error, Some(ErrorCode::NotFound));
}

#[tokio::test]
async fn bad_date_leaves_document_untouched() {
    let h = harness_with_d1(VeritasConfig::default()).await;
    let v1 = verifier_credential("v1");
    h.invoke(v1.clone(), "VerifyDocument", vec![json!("d1"), json!("2030-01-01T00:00:00Z")])
        .await;
    let before = h.raw("document:d1").await;

    let response = h
        .invoke(v1, "VerifyDocument", vec![json!("d1"), json!("not-a-date")])
        .await;
    assert!(!response.success);
    assert_eq!(response.error, Some(ErrorCode::InvalidDate));
    assert_eq!(h.raw("document:d1").await, before);

    let read_back = doc(
        h.invoke(user_credential("alice"), "GetDocument", vec![json!("d1")])
            .await
            .data,
    );
    assert_eq!(read_back.verifications.len(), 1);
}

#[tokio::test]
async fn non_verifier_is_rejected_before_any_write() {
    let h = harness_with_d1(VeritasConfig::default()).await;
    let before = h.raw("document:d1").await;

    let response = h
        .invoke(
            user_credential("alice"),
            "VerifyDocument",
            vec![json!("d1"), json!("2030-01-01T00:00:00Z")],
        )
        .await;
    assert_eq!(response.error, Some(ErrorCode::NotAVerifier));
    assert_eq!(h.raw("document:d1").await, before);
}

#[tokio::test]
async fn snapshot_policy_follows_configuration() {
    for refresh in [false, true] {
        let config = VeritasConfig {
            refresh_snapshot_on_reverify: refresh,
            ..VeritasConfig::default()
        };
        let h = harness_with_d1(config).await;
        let v1 = verifier_credential("v1");
        h.invoke(v1.clone(), "VerifyDocument", vec![json!("d1"), json!("2030-01-01T00:00:00Z")])
            .await;

        // Verifier records are immutable; rewrite it directly to simulate drift
        let renamed = veritas_records::Verifier::new("v1", "Renamed office", "B");
        h.store().put(&renamed).await.unwrap();

        let response = h
            .invoke(v1, "VerifyDocument", vec![json!("d1"), json!("2031-01-01T00:00:00Z")])
            .await;
        let document = doc(response.data);
        assert_eq!(document.verifications.len(), 1);
        if refresh {
            assert_eq!(document.verifications[0].verifier, renamed);
        } else {
            assert_eq!(document.verifications[0].verifier.name, "v1 office");
            assert_eq!(document.verifications[0].verifier.grade, "A");
        }
    }
}

#[tokio::test]
async fn verifiers_report_activity() {
    let h = harness_with_d1(VeritasConfig::default()).await;
    h.register_verifier("v2", "B").await;
    h.invoke(
        verifier_credential("v1"),
        "VerifyDocument",
        vec![json!("d1"), json!("2000-01-01T00:00:00Z")],
    )
    .await;
    h.invoke(
        verifier_credential("v2"),
        "VerifyDocument",
        vec![json!("d1"), json!("2999-01-01T00:00:00Z")],
    )
    .await;

    let ctx = h.ctx(user_credential("alice"));
    let statuses = DocumentContract::new(&ctx, DocumentKind::Document)
        .get_verifiers("d1")
        .await
        .unwrap();
    let active: Vec<_> = statuses
        .iter()
        .map(|s| (s.verification.verifier.id.as_str(), s.active))
        .collect();
    assert_eq!(active, vec![("v1", false), ("v2", true)]);
}

#[tokio::test]
async fn asset_verification_uses_the_same_rules() {
    let h = Harness::new();
    h.register_verifier("v1", "A").await;
    h.invoke_in(
        "tx-1",
        user_credential("alice"),
        "RegisterAsset",
        vec![json!("deed"), json!({}), json!("")],
    )
    .await;
    let v1 = verifier_credential("v1");

    for expiry in ["2030-01-01T00:00:00Z", "2031-01-01T00:00:00Z"] {
        let response = h
            .invoke(v1.clone(), "VerifyAsset", vec![json!("tx-1"), json!(expiry)])
            .await;
        assert!(response.success, "{}", response.message);
    }
    let ctx = h.ctx(v1.clone());
    let asset = veritas_contracts::AssetContract::new(&ctx).get("tx-1").await.unwrap();
    assert_eq!(asset.verifications.len(), 1);
    assert_eq!(asset.verifications[0].verifier_id(), &IdentityId::new("v1"));

    h.invoke(v1.clone(), "RemoveAssetVerification", vec![json!("tx-1")]).await;
    let ctx = h.ctx(v1);
    assert_matches!(
        veritas_contracts::AssetContract::new(&ctx).remove_verification("tx-1").await,
        Err(VeritasError::NotFound { .. })
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// A malformed expiry never reaches the ledger; a well-formed one is
    /// stored as the parsed instant
    #[test]
    fn expiry_is_parsed_before_any_write(
        verifier in arb_identity_name(),
        bad in arb_bad_date(),
        good in arb_rfc3339(),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let h = harness_with_d1(VeritasConfig::default()).await;
            if verifier != "v1" {
                h.register_verifier(&verifier, "A").await;
            }
            let cred = verifier_credential(&verifier);
            let before = h.raw("document:d1").await;

            let rejected = h
                .invoke(cred.clone(), "VerifyDocument", vec![json!("d1"), json!(bad)])
                .await;
            prop_assert_eq!(rejected.error, Some(ErrorCode::InvalidDate));
            prop_assert_eq!(h.raw("document:d1").await, before);

            let accepted = h
                .invoke(cred, "VerifyDocument", vec![json!("d1"), json!(good.clone())])
                .await;
            prop_assert!(accepted.success, "{}", accepted.message);
            let document = doc(accepted.data);
            prop_assert_eq!(document.verifications.len(), 1);
            prop_assert_eq!(document.verifications[0].expiry, parse_instant(&good).unwrap());
            Ok(())
        })?;
    }
}
