//! Credential and token flows against the in-memory store.

mod support;

use std::sync::Arc;

use lb_crypto::signing::IssuerKey;
use lb_proto::ROLE_BACKUP;
use lb_service::{auth::AuthService, ServiceConfig, TransferError};

use support::{record, MemoryStore};

fn auth(store: &Arc<MemoryStore>) -> AuthService<MemoryStore> {
    AuthService::new(store.clone(), IssuerKey::generate(), &ServiceConfig::default())
}

#[tokio::test]
async fn register_then_authenticate_roundtrip() {
    let store = MemoryStore::new();
    let auth = auth(&store);

    let mut alice = record("alice1");
    alice.public.roles.push(ROLE_BACKUP.into());
    auth.register(alice.clone(), "correct horse battery")
        .await
        .expect("register");

    let token = auth
        .authenticate("alice1", "correct horse battery")
        .await
        .unwrap()
        .expect("valid credentials yield a token");

    let identity = auth.verify_token(&token);
    assert_eq!(identity.account_id, Some(alice.id()));
    assert!(identity.roles.contains(ROLE_BACKUP));
}

#[tokio::test]
async fn bad_password_and_unknown_login_look_identical() {
    let store = MemoryStore::new();
    let auth = auth(&store);
    auth.register(record("alice1"), "correct horse battery")
        .await
        .unwrap();

    let wrong_password = auth.authenticate("alice1", "wrong").await.unwrap();
    let unknown_login = auth.authenticate("nobody9", "wrong").await.unwrap();
    assert!(wrong_password.is_none());
    assert!(unknown_login.is_none());
}

#[tokio::test]
async fn register_enforces_validation_and_unique_login() {
    let store = MemoryStore::new();
    let auth = auth(&store);

    let mut invalid = record("ok");
    invalid.public.username = "no".into();
    assert!(matches!(
        auth.register(invalid, "pw").await,
        Err(TransferError::Proto(_))
    ));

    auth.register(record("alice1"), "pw one").await.unwrap();
    let duplicate = record("alice1");
    assert!(matches!(
        auth.register(duplicate, "pw two").await,
        Err(TransferError::LoginTaken)
    ));
}

#[tokio::test]
async fn expired_and_tampered_tokens_resolve_to_anonymous() {
    let store = MemoryStore::new();

    let expired_config = ServiceConfig { token_ttl_days: -1, ..Default::default() };
    let expiring_auth = AuthService::new(store.clone(), IssuerKey::generate(), &expired_config);
    let alice = record("alice1");
    let stale = expiring_auth.issue_token(&alice).unwrap();
    assert!(expiring_auth.verify_token(&stale).roles.is_empty());
    assert_eq!(expiring_auth.verify_token(&stale).account_id, None);

    let auth = auth(&store);
    let token = auth.issue_token(&alice).unwrap();
    let mut tampered = token.clone();
    tampered.replace_range(0..2, "zz");
    assert_eq!(auth.verify_token(&tampered).account_id, None);
    assert_eq!(auth.verify_token("not-even-a-token").account_id, None);
}

#[tokio::test]
async fn change_password_rechecks_the_old_one() {
    let store = MemoryStore::new();
    let auth = auth(&store);

    let alice = record("alice1");
    auth.register(alice.clone(), "old password").await.unwrap();

    assert!(!auth.change_password(alice.id(), "wrong", "new password").await.unwrap());
    assert!(auth.change_password(alice.id(), "old password", "new password").await.unwrap());

    assert!(auth.authenticate("alice1", "old password").await.unwrap().is_none());
    assert!(auth.authenticate("alice1", "new password").await.unwrap().is_some());
}
