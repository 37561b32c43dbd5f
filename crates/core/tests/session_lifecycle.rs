//! Integration tests for the session lifecycle
//!
//! Drives `SessionManager` through authentication, expiry-triggered renewal,
//! failed renewal and concurrent renewal using the mock identity provider.

#![cfg(feature = "test-utils")]

use std::sync::Arc;
use std::time::Duration;

use scribe_mi_core::testing::{MockIdentityProvider, MockRequestSigner};
use scribe_mi_core::{SessionManager, SessionTransport, SignableRequest, SigningScope, TransportStrategy};
use scribe_mi_domain::{CredentialInput, MiError};

fn signed(identity: Arc<MockIdentityProvider>) -> SessionManager {
    SessionManager::new(
        identity,
        TransportStrategy::signed(Arc::new(MockRequestSigner::new()), SigningScope::default()),
    )
}

fn login() -> CredentialInput {
    CredentialInput::username_password("analyst@example.com", "correct horse")
}

fn signing_key(transport: &SessionTransport) -> String {
    match transport {
        SessionTransport::Signed { credentials, .. } => credentials.access_key_id.clone(),
        SessionTransport::Bearer { .. } => panic!("expected a signed transport"),
    }
}

fn bearer_header(transport: &SessionTransport) -> String {
    let headers = transport.authorize(&SignableRequest::new("GET", "https://api/tasks")).unwrap();
    headers.into_iter().find(|(name, _)| name == "Authorization").map(|(_, v)| v).unwrap()
}

// ============================================================================
// Authentication
// ============================================================================

/// A fresh session dispatches without any renewal
#[tokio::test]
async fn test_fresh_session_needs_no_renewal() {
    let identity = Arc::new(MockIdentityProvider::new());
    let session = signed(identity.clone());

    session.authenticate(login()).await.unwrap();
    for _ in 0..3 {
        let transport = session.ensure_fresh().await.unwrap();
        assert_eq!(signing_key(&transport), "AKIA-1");
    }

    assert_eq!(identity.token_calls(), 1);
    assert_eq!(identity.refresh_calls(), 0);
}

#[tokio::test]
async fn test_challenge_is_rejected_and_store_stays_empty() {
    let identity = Arc::new(MockIdentityProvider::new().with_challenge("SOFTWARE_TOKEN_MFA"));
    let session = signed(identity.clone());

    let err = session.authenticate(login()).await.unwrap_err();

    assert!(matches!(err, MiError::UnsupportedChallenge(ref name) if name == "SOFTWARE_TOKEN_MFA"));
    assert!(!session.is_authenticated().await);
    assert_eq!(identity.federated_id_calls(), 0);
    assert!(matches!(session.ensure_fresh().await, Err(MiError::NotAuthenticated)));
}

#[tokio::test]
async fn test_authenticate_with_refresh_token() {
    let identity = Arc::new(MockIdentityProvider::new());
    let session = SessionManager::new(identity.clone(), TransportStrategy::Bearer);

    session.authenticate(CredentialInput::refresh_token("saved-refresh")).await.unwrap();

    let inputs = identity.inputs();
    assert_eq!(inputs, vec![CredentialInput::refresh_token("saved-refresh")]);
    assert_eq!(bearer_header(&session.ensure_fresh().await.unwrap()), "id-token-1");
    assert_eq!(session.current_tokens().await.unwrap().refresh_token, "saved-refresh");

    // The grant carried no refresh token; renewal keeps presenting the saved one.
    session.reauthenticate().await.unwrap();
    assert_eq!(identity.inputs()[1], CredentialInput::refresh_token("saved-refresh"));
    assert_eq!(bearer_header(&session.ensure_fresh().await.unwrap()), "id-token-2");
}

// ============================================================================
// Renewal
// ============================================================================

/// Expired federated credentials trigger exactly one renewal that reuses the
/// stored identity id and refresh token
#[tokio::test]
async fn test_expired_credentials_renew_once() {
    let identity = Arc::new(MockIdentityProvider::new().with_credential_lifetime(-1));
    let session = signed(identity.clone());
    session.authenticate(login()).await.unwrap();

    identity.set_credential_lifetime(3600);
    let transport = session.ensure_fresh().await.unwrap();

    assert_eq!(signing_key(&transport), "AKIA-2");
    assert_eq!(identity.refresh_calls(), 1);
    assert_eq!(identity.federated_id_calls(), 1, "identity id must be reused");
    assert_eq!(identity.federated_credential_calls(), 2);
    assert_eq!(
        identity.inputs().last(),
        Some(&CredentialInput::refresh_token(MockIdentityProvider::REFRESH_TOKEN))
    );

    // The refresh grant omitted a refresh token; the original is kept.
    let tokens = session.current_tokens().await.unwrap();
    assert_eq!(tokens.refresh_token, MockIdentityProvider::REFRESH_TOKEN);
}

/// A renewal that still yields an expired credential is not retried
#[tokio::test]
async fn test_renewal_is_attempted_at_most_once_per_dispatch() {
    let identity = Arc::new(MockIdentityProvider::new().with_credential_lifetime(-1));
    let session = signed(identity.clone());
    session.authenticate(login()).await.unwrap();

    let transport = session.ensure_fresh().await.unwrap();

    assert_eq!(signing_key(&transport), "AKIA-2");
    assert_eq!(identity.refresh_calls(), 1);
}

#[tokio::test]
async fn test_failed_renewal_leaves_store_untouched() {
    let identity = Arc::new(MockIdentityProvider::new().with_credential_lifetime(-1));
    let session = signed(identity.clone());
    session.authenticate(login()).await.unwrap();
    let expiry_before = session.expiry().await;

    identity.fail_refresh(true);
    let err = session.ensure_fresh().await.unwrap_err();

    assert!(matches!(err, MiError::Identity(_)));
    assert!(session.is_authenticated().await);
    assert_eq!(session.expiry().await, expiry_before);
    assert_eq!(session.current_tokens().await.unwrap().id_token, "id-token-1");

    // Once the provider recovers, the stale session renews normally.
    identity.fail_refresh(false);
    identity.set_credential_lifetime(3600);
    assert_eq!(signing_key(&session.ensure_fresh().await.unwrap()), "AKIA-3");
}

/// Bearer sessions renew on token expiry, never on federated expiry
#[tokio::test]
async fn test_bearer_session_renews_on_token_expiry() {
    let identity = Arc::new(
        MockIdentityProvider::new().with_token_lifetime(0).with_rotating_refresh_tokens(),
    );
    let session = SessionManager::new(identity.clone(), TransportStrategy::Bearer);
    session.authenticate(login()).await.unwrap();

    identity.set_token_lifetime(3600);
    let transport = session.ensure_fresh().await.unwrap();

    assert_eq!(bearer_header(&transport), "id-token-2");
    assert_eq!(identity.federated_credential_calls(), 0);
    assert_eq!(session.current_tokens().await.unwrap().refresh_token, "mock-refresh-token-2");
}

#[tokio::test]
async fn test_explicit_reauthenticate_replaces_credentials() {
    let identity = Arc::new(MockIdentityProvider::new());
    let session = signed(identity.clone());
    session.authenticate(login()).await.unwrap();

    session.reauthenticate().await.unwrap();

    assert_eq!(signing_key(&session.ensure_fresh().await.unwrap()), "AKIA-2");
    assert_eq!(session.identity_id().await.as_deref(), Some(MockIdentityProvider::IDENTITY_ID));
}

// ============================================================================
// Concurrency
// ============================================================================

/// Concurrent callers that all observe an expired credential share one renewal
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_a_single_renewal() {
    // Latency keeps the renewal in flight long enough for callers to pile up.
    let identity = Arc::new(
        MockIdentityProvider::new()
            .with_credential_lifetime(-1)
            .with_latency(Duration::from_millis(20)),
    );
    let session = Arc::new(signed(identity.clone()));
    session.authenticate(login()).await.unwrap();
    identity.set_credential_lifetime(3600);

    let callers = (0..8).map(|_| {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.ensure_fresh().await })
    });
    let results = futures::future::join_all(callers).await;

    for result in results {
        let transport = result.unwrap().unwrap();
        assert_eq!(signing_key(&transport), "AKIA-2");
    }
    assert_eq!(identity.refresh_calls(), 1);
    assert_eq!(identity.federated_credential_calls(), 2);
}
