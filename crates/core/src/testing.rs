//! Mock implementations of the session ports
//!
//! Enabled with the `test-utils` feature so that infra and integration tests
//! can drive a real `SessionManager` without an identity provider.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use scribe_mi_domain::{
    CredentialInput, FederatedCredentials, MiError, Result, TokenGrant, Tokens,
};

use crate::session::ports::{IdentityProvider, RequestSigner, SignableRequest, SigningScope};

/// Mock identity provider
///
/// Every token grant is numbered, so id tokens read `id-token-1`,
/// `id-token-2`, ... and signing keys `AKIA-1`, `AKIA-2`, ... which lets
/// tests tell a renewed credential from the original.
#[derive(Debug)]
pub struct MockIdentityProvider {
    token_lifetime_secs: AtomicI64,
    credential_lifetime_secs: AtomicI64,
    challenge: Mutex<Option<String>>,
    fail_refresh: AtomicBool,
    rotate_refresh_token: AtomicBool,
    latency: Mutex<Option<Duration>>,
    token_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    federated_id_calls: AtomicUsize,
    federated_credential_calls: AtomicUsize,
    inputs: Mutex<Vec<CredentialInput>>,
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentityProvider {
    pub const IDENTITY_ID: &'static str = "eu-west-2:00000000-mock-identity";
    pub const REFRESH_TOKEN: &'static str = "mock-refresh-token";

    /// Provider issuing one-hour tokens and credentials
    pub fn new() -> Self {
        Self {
            token_lifetime_secs: AtomicI64::new(3600),
            credential_lifetime_secs: AtomicI64::new(3600),
            challenge: Mutex::new(None),
            fail_refresh: AtomicBool::new(false),
            rotate_refresh_token: AtomicBool::new(false),
            latency: Mutex::new(None),
            token_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            federated_id_calls: AtomicUsize::new(0),
            federated_credential_calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Lifetime of issued tokens; zero or negative issues already-expired tokens
    pub fn with_token_lifetime(self, secs: i64) -> Self {
        self.token_lifetime_secs.store(secs, Ordering::SeqCst);
        self
    }

    /// Lifetime of issued federated credentials
    pub fn with_credential_lifetime(self, secs: i64) -> Self {
        self.credential_lifetime_secs.store(secs, Ordering::SeqCst);
        self
    }

    /// Answer every token request with this challenge
    pub fn with_challenge(self, name: impl Into<String>) -> Self {
        *self.challenge.lock().unwrap() = Some(name.into());
        self
    }

    /// Delay every provider call, widening race windows in concurrency tests
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap() = Some(latency);
        self
    }

    /// Issue a fresh refresh token on every grant instead of omitting it
    pub fn with_rotating_refresh_tokens(self) -> Self {
        self.rotate_refresh_token.store(true, Ordering::SeqCst);
        self
    }

    /// Make subsequent refresh-token grants fail
    pub fn fail_refresh(&self, fail: bool) {
        self.fail_refresh.store(fail, Ordering::SeqCst);
    }

    pub fn set_token_lifetime(&self, secs: i64) {
        self.token_lifetime_secs.store(secs, Ordering::SeqCst);
    }

    pub fn set_credential_lifetime(&self, secs: i64) {
        self.credential_lifetime_secs.store(secs, Ordering::SeqCst);
    }

    /// Total token requests (password and refresh)
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn federated_id_calls(&self) -> usize {
        self.federated_id_calls.load(Ordering::SeqCst)
    }

    pub fn federated_credential_calls(&self) -> usize {
        self.federated_credential_calls.load(Ordering::SeqCst)
    }

    /// Inputs passed to `get_tokens`, oldest first
    pub fn inputs(&self) -> Vec<CredentialInput> {
        self.inputs.lock().unwrap().clone()
    }

    async fn delay(&self) {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn get_tokens(&self, input: &CredentialInput) -> Result<TokenGrant> {
        self.delay().await;
        let grant = self.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.inputs.lock().unwrap().push(input.clone());

        if let Some(name) = self.challenge.lock().unwrap().clone() {
            return Ok(TokenGrant::Challenge { name });
        }

        let refresh_token = match input {
            CredentialInput::UsernamePassword { .. } => Self::REFRESH_TOKEN.to_string(),
            CredentialInput::RefreshToken(_) => {
                self.refresh_calls.fetch_add(1, Ordering::SeqCst);
                if self.fail_refresh.load(Ordering::SeqCst) {
                    return Err(MiError::Identity("refresh token has been revoked".into()));
                }
                if self.rotate_refresh_token.load(Ordering::SeqCst) {
                    format!("{}-{grant}", Self::REFRESH_TOKEN)
                } else {
                    String::new()
                }
            }
        };

        Ok(TokenGrant::Tokens(Tokens::new(
            format!("id-token-{grant}"),
            format!("access-token-{grant}"),
            refresh_token,
            self.token_lifetime_secs.load(Ordering::SeqCst),
        )))
    }

    async fn get_federated_id(&self, _id_token: &str) -> Result<String> {
        self.delay().await;
        self.federated_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::IDENTITY_ID.to_string())
    }

    async fn get_federated_credentials(
        &self,
        identity_id: &str,
        id_token: &str,
    ) -> Result<FederatedCredentials> {
        self.delay().await;
        self.federated_credential_calls.fetch_add(1, Ordering::SeqCst);
        if identity_id != Self::IDENTITY_ID {
            return Err(MiError::Identity(format!("unknown identity {identity_id}")));
        }
        let grant = id_token.trim_start_matches("id-token-");
        let lifetime = self.credential_lifetime_secs.load(Ordering::SeqCst);
        Ok(FederatedCredentials {
            access_key_id: format!("AKIA-{grant}"),
            secret_key: format!("secret-{grant}"),
            session_token: format!("session-{grant}"),
            expiration: Utc::now() + chrono::Duration::seconds(lifetime),
        })
    }
}

/// Mock request signer
///
/// Emits a readable `authorization` header naming the key id and scope,
/// plus the session token, instead of computing a real signature.
#[derive(Debug, Default)]
pub struct MockRequestSigner {
    sign_count: AtomicUsize,
    fail: AtomicBool,
}

impl MockRequestSigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { sign_count: AtomicUsize::new(0), fail: AtomicBool::new(true) }
    }

    pub fn sign_count(&self) -> usize {
        self.sign_count.load(Ordering::SeqCst)
    }
}

impl RequestSigner for MockRequestSigner {
    fn sign(
        &self,
        request: &SignableRequest,
        credentials: &FederatedCredentials,
        scope: &SigningScope,
    ) -> Result<Vec<(String, String)>> {
        self.sign_count.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(MiError::Signing("mock signer configured to fail".into()));
        }
        Ok(vec![
            (
                "authorization".to_string(),
                format!(
                    "MOCK-SIGNED Credential={}/{}/{} Method={}",
                    credentials.access_key_id, scope.region, scope.service, request.method
                ),
            ),
            ("x-amz-security-token".to_string(), credentials.session_token.clone()),
        ])
    }
}
