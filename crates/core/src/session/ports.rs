//! Port interfaces for session establishment
//!
//! The identity provider and the request-signing algorithm are external
//! collaborators. Infra (or a test double) supplies the implementations.

use async_trait::async_trait;
use scribe_mi_domain::constants::{DEFAULT_SIGNING_REGION, SIGNING_SERVICE};
use scribe_mi_domain::{CredentialInput, FederatedCredentials, Result, TokenGrant};

/// Identity capability: user pool tokens and identity federation
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange a username/password pair or a refresh token for tokens
    ///
    /// Returns `TokenGrant::Challenge` when the provider wants an interactive
    /// step answered instead.
    async fn get_tokens(&self, input: &CredentialInput) -> Result<TokenGrant>;

    /// Resolve the federated identity id for an identity token
    async fn get_federated_id(&self, id_token: &str) -> Result<String>;

    /// Exchange an identity id and token for short-lived signing credentials
    async fn get_federated_credentials(
        &self,
        identity_id: &str,
        id_token: &str,
    ) -> Result<FederatedCredentials>;
}

/// The parts of an outgoing request a signer needs to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl SignableRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self { method: method.into(), url: url.into(), headers: Vec::new(), body: Vec::new() }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// Service and region a signature is scoped to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningScope {
    pub service: String,
    pub region: String,
}

impl SigningScope {
    pub fn new(service: impl Into<String>, region: impl Into<String>) -> Self {
        Self { service: service.into(), region: region.into() }
    }

    /// API gateway scope in the given region
    pub fn for_region(region: impl Into<String>) -> Self {
        Self::new(SIGNING_SERVICE, region)
    }
}

impl Default for SigningScope {
    fn default() -> Self {
        Self::new(SIGNING_SERVICE, DEFAULT_SIGNING_REGION)
    }
}

/// Request-signing algorithm
///
/// Produces the headers to attach; the request itself is left untouched.
pub trait RequestSigner: Send + Sync {
    fn sign(
        &self,
        request: &SignableRequest,
        credentials: &FederatedCredentials,
        scope: &SigningScope,
    ) -> Result<Vec<(String, String)>>;
}
