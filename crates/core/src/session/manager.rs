//! Session manager
//!
//! Owns the credential store for one client instance and drives the
//! identity provider through authentication and renewal.
//!
//! Renewals are single-flight: concurrent callers that find the credential
//! expired queue on one guard, and whoever gets it second re-checks expiry
//! before deciding to renew again.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use scribe_mi_domain::{CredentialInput, MiError, Result, TokenGrant, Tokens};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use super::credential_store::{CredentialStore, Credentials};
use super::ports::IdentityProvider;
use super::transport::{SessionTransport, TransportStrategy};

#[derive(Default)]
struct SessionState {
    store: CredentialStore,
    transport: Option<SessionTransport>,
}

/// Authenticated session for one client instance
pub struct SessionManager {
    identity: Arc<dyn IdentityProvider>,
    strategy: TransportStrategy,
    state: RwLock<SessionState>,
    renewal: Mutex<()>,
}

impl SessionManager {
    pub fn new(identity: Arc<dyn IdentityProvider>, strategy: TransportStrategy) -> Self {
        Self {
            identity,
            strategy,
            state: RwLock::new(SessionState::default()),
            renewal: Mutex::new(()),
        }
    }

    pub fn strategy(&self) -> &TransportStrategy {
        &self.strategy
    }

    /// Establish a session from a username/password pair or a refresh token
    ///
    /// On failure the store is left exactly as it was.
    ///
    /// # Errors
    /// - `UnsupportedChallenge` if the provider asks for an interactive step
    /// - identity-provider failures as returned by the provider
    #[instrument(skip_all, fields(transport = self.strategy.name()))]
    pub async fn authenticate(&self, input: CredentialInput) -> Result<()> {
        let _renewal = self.renewal.lock().await;

        let mut tokens = self.request_tokens(&input).await?;
        if let CredentialInput::RefreshToken(used) = &input {
            tokens = carry_refresh_token(tokens, used);
        }
        let credentials = self.derive_credentials(tokens, None).await?;
        self.install(credentials).await?;

        info!("Session authenticated");
        Ok(())
    }

    /// Renew the session with the stored refresh token
    ///
    /// In signed mode the stored federated identity id is reused; only the
    /// signing credentials are re-issued.
    ///
    /// # Errors
    /// `NotAuthenticated` if `authenticate` never succeeded; otherwise any
    /// identity-provider failure, leaving the previous credentials in place.
    #[instrument(skip_all, fields(transport = self.strategy.name()))]
    pub async fn reauthenticate(&self) -> Result<()> {
        let _renewal = self.renewal.lock().await;
        self.renew().await
    }

    /// Transport for the next request, renewing at most once if expired
    ///
    /// # Errors
    /// `NotAuthenticated` before any successful `authenticate`, or the
    /// renewal failure.
    pub async fn ensure_fresh(&self) -> Result<SessionTransport> {
        if let Some(transport) = self.fresh_transport(Utc::now()).await? {
            return Ok(transport);
        }

        let _renewal = self.renewal.lock().await;
        if let Some(transport) = self.fresh_transport(Utc::now()).await? {
            debug!("Session renewed by a concurrent caller");
            return Ok(transport);
        }

        debug!("Session credential expired, reauthenticating");
        self.renew().await?;

        // Dispatch with whatever the renewal produced, even if it is already
        // past its expiry; there is no second attempt.
        self.state.read().await.transport.clone().ok_or(MiError::NotAuthenticated)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.store.is_present()
    }

    /// Expiry of the credential renewals are keyed on
    pub async fn expiry(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.store.expiry()
    }

    pub async fn current_tokens(&self) -> Option<Tokens> {
        self.state.read().await.store.credentials().tokens().cloned()
    }

    /// Federated identity id (signed deployments only)
    pub async fn identity_id(&self) -> Option<String> {
        self.state.read().await.store.credentials().identity_id().map(str::to_owned)
    }

    // Caller must hold the renewal guard.
    async fn renew(&self) -> Result<()> {
        let (previous, identity_id) = {
            let state = self.state.read().await;
            let credentials = state.store.credentials();
            let tokens = credentials.tokens().ok_or(MiError::NotAuthenticated)?;
            (tokens.clone(), credentials.identity_id().map(str::to_owned))
        };

        let refreshed = self
            .request_tokens(&CredentialInput::RefreshToken(previous.refresh_token.clone()))
            .await
            .map_err(|err| {
                warn!(error = %err, "Session renewal failed, keeping previous credentials");
                err
            })?;
        let tokens = carry_refresh_token(refreshed, &previous.refresh_token);

        let credentials = self.derive_credentials(tokens, identity_id).await.map_err(|err| {
            warn!(error = %err, "Federated credential renewal failed, keeping previous credentials");
            err
        })?;
        self.install(credentials).await?;

        info!("Session reauthenticated");
        Ok(())
    }

    async fn request_tokens(&self, input: &CredentialInput) -> Result<Tokens> {
        match self.identity.get_tokens(input).await? {
            TokenGrant::Tokens(tokens) => Ok(tokens),
            TokenGrant::Challenge { name } => {
                warn!(challenge = %name, "Identity provider returned an interactive challenge");
                Err(MiError::UnsupportedChallenge(name))
            }
        }
    }

    async fn derive_credentials(
        &self,
        tokens: Tokens,
        known_identity: Option<String>,
    ) -> Result<Credentials> {
        if !self.strategy.requires_federation() {
            return Ok(Credentials::Tokens { tokens });
        }

        let identity_id = match known_identity {
            Some(id) => id,
            None => self.identity.get_federated_id(&tokens.id_token).await?,
        };
        let credentials =
            self.identity.get_federated_credentials(&identity_id, &tokens.id_token).await?;

        Ok(Credentials::Federated { tokens, identity_id, credentials })
    }

    async fn install(&self, credentials: Credentials) -> Result<()> {
        let expiry = self.strategy.expiry_of(&credentials)?;
        let transport = self.strategy.bind(&credentials)?;

        let mut state = self.state.write().await;
        state.store.replace(credentials, expiry);
        state.transport = Some(transport);
        debug!(expires_at = %expiry, "Credential store replaced");
        Ok(())
    }

    async fn fresh_transport(&self, now: DateTime<Utc>) -> Result<Option<SessionTransport>> {
        let state = self.state.read().await;
        if !state.store.is_present() {
            return Err(MiError::NotAuthenticated);
        }
        if state.store.is_expired(now) {
            return Ok(None);
        }
        state.transport.clone().map(Some).ok_or(MiError::NotAuthenticated)
    }
}

/// Refresh grants may omit the refresh token; keep using the one presented.
fn carry_refresh_token(mut refreshed: Tokens, presented: &str) -> Tokens {
    if refreshed.refresh_token.is_empty() {
        refreshed.refresh_token = presented.to_string();
    }
    refreshed
}
