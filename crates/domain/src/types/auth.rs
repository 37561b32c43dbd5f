//! Session credential types
//!
//! Values exchanged with the external identity capability. Secrets are
//! redacted from `Debug` output so they never reach the logs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity-provider issued tokens
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tokens {
    /// JWT proving the user's identity; exchanged for federated credentials
    pub id_token: String,
    pub access_token: String,
    /// Long-lived token used by reauthentication
    pub refresh_token: String,
    /// Token lifetime in seconds as reported by the provider
    pub expires_in: i64,
    /// Absolute expiration timestamp (UTC), derived from `expires_in`
    pub expires_at: DateTime<Utc>,
}

impl Tokens {
    /// Create a token set whose expiry is `expires_in` seconds from now
    #[must_use]
    pub fn new(
        id_token: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: i64,
    ) -> Self {
        Self {
            id_token: id_token.into(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_in,
            expires_at: Utc::now() + chrono::Duration::seconds(expires_in),
        }
    }

    /// Seconds until the tokens expire (negative once expired)
    pub fn seconds_until_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }
}

impl fmt::Debug for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokens")
            .field("id_token", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Short-lived signing credentials exchanged for an identity token
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FederatedCredentials {
    pub access_key_id: String,
    pub secret_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
}

impl fmt::Debug for FederatedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FederatedCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Input accepted by `authenticate`
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialInput {
    UsernamePassword { username: String, password: String },
    RefreshToken(String),
}

impl CredentialInput {
    pub fn username_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::UsernamePassword { username: username.into(), password: password.into() }
    }

    pub fn refresh_token(token: impl Into<String>) -> Self {
        Self::RefreshToken(token.into())
    }
}

impl fmt::Debug for CredentialInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsernamePassword { username, .. } => f
                .debug_struct("UsernamePassword")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::RefreshToken(_) => f.debug_tuple("RefreshToken").field(&"<redacted>").finish(),
        }
    }
}

/// Outcome of a token request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenGrant {
    /// Final tokens were issued
    Tokens(Tokens),
    /// The provider wants an interactive challenge answered (MFA, new
    /// password, ...). Never answered by this client.
    Challenge { name: String },
}
