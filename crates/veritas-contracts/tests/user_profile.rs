//! Users, verifier registry and per-field profile verification

use serde_json::json;
use veritas_core::{ErrorCode, IdentityId};
use veritas_records::{User, VerificationStatus, Verifier};
use veritas_testkit::{user_credential, verifier_credential, Harness};

fn user(data: Option<serde_json::Value>) -> User {
    serde_json::from_value(data.expect("user data")).expect("user json")
}

async fn setup() -> Harness {
    let h = Harness::new();
    h.register_user("alice").await;
    h.register_verifier("v1", "A").await;
    h
}

#[tokio::test]
async fn users_and_verifiers_register_once() {
    let h = setup().await;
    let dup_user = h.invoke(user_credential("alice"), "CreateUser", vec![]).await;
    assert_eq!(dup_user.error, Some(ErrorCode::AlreadyExists));

    let dup_verifier = h
        .invoke(verifier_credential("v1"), "CreateVerifier", vec![json!("Again"), json!("B")])
        .await;
    assert_eq!(dup_verifier.error, Some(ErrorCode::AlreadyExists));

    // Users and verifiers live in separate key spaces
    let v1_as_user = h.invoke(verifier_credential("v1"), "CreateUser", vec![]).await;
    assert!(v1_as_user.success);

    let fetched = h.invoke(user_credential("x"), "GetVerifier", vec![json!("v1")]).await;
    let verifier: Verifier = serde_json::from_value(fetched.data.unwrap()).unwrap();
    assert_eq!(verifier.grade, "A");

    let missing = h.invoke(user_credential("x"), "GetVerifier", vec![json!("alice")]).await;
    assert_eq!(missing.error, Some(ErrorCode::NotFound));
}

#[tokio::test]
async fn all_verifiers_are_listed() {
    let h = setup().await;
    h.register_verifier("v2", "B").await;
    let listed = h.invoke(user_credential("x"), "GetAllVerifiers", vec![]).await;
    let verifiers: Vec<Verifier> = serde_json::from_value(listed.data.unwrap()).unwrap();
    let ids: Vec<_> = verifiers.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["v1", "v2"]);
}

#[tokio::test]
async fn fields_are_verified_independently() {
    let h = setup().await;
    let v1 = verifier_credential("v1");

    let response = h
        .invoke(
            v1.clone(),
            "AddUserProfileVerification",
            vec![
                json!("alice"),
                json!(["email", "phone"]),
                json!(["2030-01-01T00:00:00Z", "2031-01-01T00:00:00Z"]),
            ],
        )
        .await;
    assert!(response.success, "{}", response.message);
    let alice = user(response.data);
    assert_eq!(alice.field_verifications("email").len(), 1);
    assert_eq!(alice.field_verifications("phone").len(), 1);

    let again = h
        .invoke(
            v1.clone(),
            "AddUserProfileVerification",
            vec![json!("alice"), json!(["email"]), json!(["2032-01-01T00:00:00Z"])],
        )
        .await;
    assert_eq!(user(again.data).field_verifications("email").len(), 1);

    let removed = h
        .invoke(v1.clone(), "RemoveUserProfileVerification", vec![json!("alice"), json!("email")])
        .await;
    let alice = user(removed.data);
    assert!(alice.field_verifications("email").is_empty());
    assert!(alice.profile_verifications.contains_key("email"));
    assert_eq!(alice.field_verifications("phone").len(), 1);

    let listed = h
        .invoke(
            user_credential("x"),
            "GetProfileVerifications",
            vec![json!("alice"), json!("phone")],
        )
        .await;
    let statuses: Vec<VerificationStatus> = serde_json::from_value(listed.data.unwrap()).unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].verification.verifier.id, IdentityId::new("v1"));
}

#[tokio::test]
async fn one_bad_date_rejects_the_batch() {
    let h = setup().await;
    let before = h.raw("user:alice").await;

    let response = h
        .invoke(
            verifier_credential("v1"),
            "AddUserProfileVerification",
            vec![
                json!("alice"),
                json!(["email", "phone"]),
                json!(["2030-01-01T00:00:00Z", "soon"]),
            ],
        )
        .await;
    assert_eq!(response.error, Some(ErrorCode::InvalidDate));
    assert_eq!(h.raw("user:alice").await, before);

    let mismatched = h
        .invoke(
            verifier_credential("v1"),
            "AddUserProfileVerification",
            vec![json!("alice"), json!(["email", "phone"]), json!(["2030-01-01T00:00:00Z"])],
        )
        .await;
    assert_eq!(mismatched.error, Some(ErrorCode::InvalidArgument));
}

#[tokio::test]
async fn clearing_keeps_the_field() {
    let h = setup().await;
    h.invoke(
        verifier_credential("v1"),
        "AddUserProfileVerification",
        vec![json!("alice"), json!(["email"]), json!(["2030-01-01T00:00:00Z"])],
    )
    .await;

    let cleared = h
        .invoke(user_credential("alice"), "ClearProfileField", vec![json!("email")])
        .await;
    let alice = user(cleared.data);
    assert_eq!(alice.profile_verifications.get("email"), Some(&Vec::new()));

    let unknown = h
        .invoke(user_credential("ghost"), "ClearProfileField", vec![json!("email")])
        .await;
    assert_eq!(unknown.error, Some(ErrorCode::NotFound));
}

#[tokio::test]
async fn only_the_user_may_delete_themself() {
    let h = setup().await;
    let denied = h
        .invoke(user_credential("mallory"), "DeleteUser", vec![json!("alice")])
        .await;
    assert_eq!(denied.error, Some(ErrorCode::NotAuthorized));
    assert!(h.raw("user:alice").await.is_some());

    let deleted = h
        .invoke(user_credential("alice"), "DeleteUser", vec![json!("alice")])
        .await;
    assert!(deleted.success);
    assert!(deleted.data.is_none());
    assert!(h.raw("user:alice").await.is_none());

    let twice = h
        .invoke(user_credential("alice"), "DeleteUser", vec![json!("alice")])
        .await;
    assert_eq!(twice.error, Some(ErrorCode::NotFound));
}
