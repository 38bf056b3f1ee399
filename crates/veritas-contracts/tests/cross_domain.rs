//! Verifier lookup through another ledger domain

use assert_matches::assert_matches;
use serde_json::json;
use std::sync::Arc;
use veritas_contracts::{fetch_verifier, ContractRuntime, LocalDomainRouter};
use veritas_core::{
    CrossDomainEffects, DomainRef, ErrorCode, IdentityId, RegistryLocation, VeritasConfig,
    VeritasError,
};
use veritas_effects::MemoryLedgerHandler;
use veritas_testkit::{user_credential, verifier_credential, Harness};

fn remote_registry_config(domain: &str) -> VeritasConfig {
    VeritasConfig {
        verifier_registry: RegistryLocation::Domain {
            domain: DomainRef::new(domain),
        },
        ..VeritasConfig::default()
    }
}

/// Registry harness holding verifiers, and an asset ledger routed to it
async fn domains() -> (Harness, MemoryLedgerHandler, ContractRuntime) {
    let registry = Harness::new();
    registry.register_verifier("v1", "A").await;

    let router = LocalDomainRouter::new().with_domain("global", registry.ledger_arc());
    let assets = MemoryLedgerHandler::new();
    let runtime = ContractRuntime::new(Arc::new(assets.clone()), remote_registry_config("global"))
        .with_cross_domain(Arc::new(router));
    (registry, assets, runtime)
}

#[tokio::test]
async fn asset_verified_with_remote_verifier() {
    let (_registry, assets, runtime) = domains().await;
    assets.begin_transaction("tx-1");
    runtime
        .invoke(
            user_credential("alice"),
            "RegisterAsset",
            vec![json!("deed"), json!({}), json!("")],
        )
        .await;

    let response = runtime
        .invoke(
            verifier_credential("v1"),
            "VerifyAsset",
            vec![json!("tx-1"), json!("2030-01-01T00:00:00Z")],
        )
        .await;
    assert!(response.success, "{}", response.message);
    assert_eq!(response.data.unwrap()["verifications"][0]["verifier"]["grade"], "A");
}

#[tokio::test]
async fn absent_remote_verifier_is_not_a_verifier() {
    let (_registry, assets, runtime) = domains().await;
    assets.begin_transaction("tx-1");
    runtime
        .invoke(
            user_credential("alice"),
            "RegisterAsset",
            vec![json!("deed"), json!({}), json!("")],
        )
        .await;

    let response = runtime
        .invoke(
            user_credential("v9"),
            "VerifyAsset",
            vec![json!("tx-1"), json!("2030-01-01T00:00:00Z")],
        )
        .await;
    assert_eq!(response.error, Some(ErrorCode::NotAVerifier));
}

#[tokio::test]
async fn unreachable_domain_is_distinguished() {
    let registry = Harness::new();
    let router = LocalDomainRouter::new().with_domain("global", registry.ledger_arc());
    let assets = MemoryLedgerHandler::new();
    let runtime =
        ContractRuntime::new(Arc::new(assets.clone()), remote_registry_config("elsewhere"))
            .with_cross_domain(Arc::new(router));
    assets.begin_transaction("tx-1");
    runtime
        .invoke(
            user_credential("alice"),
            "RegisterAsset",
            vec![json!("deed"), json!({}), json!("")],
        )
        .await;
    let before = assets.snapshot().await;

    let response = runtime
        .invoke(
            verifier_credential("v1"),
            "VerifyAsset",
            vec![json!("tx-1"), json!("2030-01-01T00:00:00Z")],
        )
        .await;
    assert_eq!(response.error, Some(ErrorCode::CrossDomain));
    assert_eq!(assets.snapshot().await, before);
}

#[tokio::test]
async fn remote_registry_without_route_is_a_config_error() {
    let assets = MemoryLedgerHandler::new();
    let runtime = ContractRuntime::new(Arc::new(assets), remote_registry_config("global"));
    let response = runtime
        .invoke(
            verifier_credential("v1"),
            "VerifyAsset",
            vec![json!("tx-1"), json!("2030-01-01T00:00:00Z")],
        )
        .await;
    assert_eq!(response.error, Some(ErrorCode::Config));
}

#[tokio::test]
async fn router_rejects_unknown_operations() {
    let registry = Harness::new();
    registry.register_verifier("v1", "A").await;
    let router = LocalDomainRouter::new().with_domain("global", registry.ledger_arc());

    let found = fetch_verifier(&router, &DomainRef::new("global"), &IdentityId::new("v1"))
        .await
        .unwrap();
    assert_eq!(found.map(|v| v.grade), Some("A".to_string()));

    let absent = fetch_verifier(&router, &DomainRef::new("global"), &IdentityId::new("v2"))
        .await
        .unwrap();
    assert!(absent.is_none());

    assert!(router
        .invoke_domain(&DomainRef::new("global"), "DeleteUser", &["v1".to_string()])
        .await
        .is_err());
    assert_matches!(
        fetch_verifier(&router, &DomainRef::new("nowhere"), &IdentityId::new("v1")).await,
        Err(VeritasError::CrossDomain { domain, .. }) if domain == "nowhere"
    );
}
