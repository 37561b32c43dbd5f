//! Transport strategies
//!
//! A deployment either signs every request with federated credentials or
//! sends the identity token as a bearer header. Each strategy has exactly one
//! expiry source: federated-credential expiration for signed transports,
//! token expiry for bearer transports.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use scribe_mi_domain::{FederatedCredentials, MiError, Result};

use super::credential_store::Credentials;
use super::ports::{RequestSigner, SignableRequest, SigningScope};

/// How a session authorizes requests
#[derive(Clone)]
pub enum TransportStrategy {
    Signed { signer: Arc<dyn RequestSigner>, scope: SigningScope },
    Bearer,
}

impl TransportStrategy {
    pub fn signed(signer: Arc<dyn RequestSigner>, scope: SigningScope) -> Self {
        Self::Signed { signer, scope }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Signed { .. } => "signed",
            Self::Bearer => "bearer",
        }
    }

    /// Whether establishing a session must go through identity federation
    pub fn requires_federation(&self) -> bool {
        matches!(self, Self::Signed { .. })
    }

    /// Expiry of the credential this strategy renews on
    ///
    /// # Errors
    /// `Internal` if the credentials do not fit the strategy.
    pub fn expiry_of(&self, credentials: &Credentials) -> Result<DateTime<Utc>> {
        match (self, credentials) {
            (Self::Signed { .. }, Credentials::Federated { credentials, .. }) => {
                Ok(credentials.expiration)
            }
            (Self::Bearer, Credentials::Tokens { tokens } | Credentials::Federated { tokens, .. }) => {
                Ok(tokens.expires_at)
            }
            _ => Err(MiError::Internal(format!(
                "{} transport cannot use {} credentials",
                self.name(),
                credential_kind(credentials)
            ))),
        }
    }

    /// Bind credentials into a transport that can authorize requests
    ///
    /// # Errors
    /// `Internal` if the credentials do not fit the strategy.
    pub fn bind(&self, credentials: &Credentials) -> Result<SessionTransport> {
        match (self, credentials) {
            (Self::Signed { signer, scope }, Credentials::Federated { credentials, .. }) => {
                Ok(SessionTransport::Signed {
                    signer: Arc::clone(signer),
                    scope: scope.clone(),
                    credentials: credentials.clone(),
                })
            }
            (Self::Bearer, Credentials::Tokens { tokens } | Credentials::Federated { tokens, .. }) => {
                Ok(SessionTransport::Bearer { id_token: tokens.id_token.clone() })
            }
            _ => Err(MiError::Internal(format!(
                "{} transport cannot use {} credentials",
                self.name(),
                credential_kind(credentials)
            ))),
        }
    }
}

impl fmt::Debug for TransportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed { scope, .. } => f.debug_struct("Signed").field("scope", scope).finish(),
            Self::Bearer => f.write_str("Bearer"),
        }
    }
}

fn credential_kind(credentials: &Credentials) -> &'static str {
    match credentials {
        Credentials::Absent => "absent",
        Credentials::Tokens { .. } => "token-only",
        Credentials::Federated { .. } => "federated",
    }
}

/// Credentials bound to a strategy, ready to authorize requests
#[derive(Clone)]
pub enum SessionTransport {
    Signed { signer: Arc<dyn RequestSigner>, scope: SigningScope, credentials: FederatedCredentials },
    Bearer { id_token: String },
}

impl SessionTransport {
    /// Headers that authorize `request`
    ///
    /// # Errors
    /// Propagates signer failures.
    pub fn authorize(&self, request: &SignableRequest) -> Result<Vec<(String, String)>> {
        match self {
            Self::Signed { signer, scope, credentials } => {
                signer.sign(request, credentials, scope)
            }
            Self::Bearer { id_token } => Ok(vec![("Authorization".to_string(), id_token.clone())]),
        }
    }
}

impl fmt::Debug for SessionTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed { scope, credentials, .. } => f
                .debug_struct("Signed")
                .field("scope", scope)
                .field("credentials", credentials)
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("id_token", &"<redacted>").finish(),
        }
    }
}
