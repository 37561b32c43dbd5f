//! In-memory credential store
//!
//! Holds whatever the current session needs to authorize requests plus the
//! instant it stops being valid. Contents are only ever replaced wholesale.

use chrono::{DateTime, Utc};
use scribe_mi_domain::{FederatedCredentials, Tokens};

/// Credentials held by a session, by deployment mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    Absent,
    /// Bearer deployments only need the identity-provider tokens
    Tokens { tokens: Tokens },
    /// Signed deployments also hold federated signing credentials
    Federated { tokens: Tokens, identity_id: String, credentials: FederatedCredentials },
}

impl Credentials {
    pub fn tokens(&self) -> Option<&Tokens> {
        match self {
            Self::Absent => None,
            Self::Tokens { tokens } | Self::Federated { tokens, .. } => Some(tokens),
        }
    }

    pub fn identity_id(&self) -> Option<&str> {
        match self {
            Self::Federated { identity_id, .. } => Some(identity_id),
            _ => None,
        }
    }

    pub fn federated(&self) -> Option<&FederatedCredentials> {
        match self {
            Self::Federated { credentials, .. } => Some(credentials),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credentials: Credentials,
    expiry: Option<DateTime<Utc>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        !matches!(self.credentials, Credentials::Absent)
    }

    /// True once `now` has reached the expiry, or when nothing is stored
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) if self.is_present() => expiry <= now,
            _ => true,
        }
    }

    pub fn replace(&mut self, credentials: Credentials, expiry: DateTime<Utc>) {
        self.credentials = credentials;
        self.expiry = Some(expiry);
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }
}
