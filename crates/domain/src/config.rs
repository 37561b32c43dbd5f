//! Environment record for the MI client
//!
//! Loading and parsing live in `scribe-mi-infra::config`; this module only
//! defines the validated shape.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SIGNING_REGION;
use crate::errors::{MiError, Result};

/// Environment values supplying the API host and identity-provider identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// API host (e.g. "mi.api.example.com"), optionally with a scheme
    pub api_url: String,
    /// Identity-provider user pool
    pub user_pool_id: String,
    /// Identity-provider application client id
    pub client_id: String,
    /// Federated identity pool; present only for signed deployments
    #[serde(default)]
    pub identity_pool_id: Option<String>,
    /// Region used when signing requests
    #[serde(default)]
    pub region: Option<String>,
}

/// How requests to the API are authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    /// Requests are signed with short-lived federated credentials
    Federated,
    /// Requests carry the identity token in an `Authorization` header
    Bearer,
}

impl Environment {
    /// Create an environment for a bearer-token deployment
    pub fn new(
        api_url: impl Into<String>,
        user_pool_id: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            user_pool_id: user_pool_id.into(),
            client_id: client_id.into(),
            identity_pool_id: None,
            region: None,
        }
    }

    /// Attach a federated identity pool, switching to signed requests
    #[must_use]
    pub fn with_identity_pool(mut self, identity_pool_id: impl Into<String>) -> Self {
        self.identity_pool_id = Some(identity_pool_id.into());
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Ensure every required field is non-empty
    ///
    /// # Errors
    /// Returns `MiError::Config` naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("api_url", &self.api_url),
            ("user_pool_id", &self.user_pool_id),
            ("client_id", &self.client_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(MiError::Config(format!("{name} must not be empty")));
            }
        }
        if matches!(&self.identity_pool_id, Some(pool) if pool.trim().is_empty()) {
            return Err(MiError::Config("identity_pool_id must not be empty when set".into()));
        }
        Ok(())
    }

    pub fn deployment_mode(&self) -> DeploymentMode {
        if self.identity_pool_id.is_some() {
            DeploymentMode::Federated
        } else {
            DeploymentMode::Bearer
        }
    }

    /// Base URL every endpoint path is appended to
    ///
    /// A bare host gets `https://`; an explicit scheme is kept as-is.
    pub fn base_url(&self) -> String {
        let trimmed = self.api_url.trim().trim_end_matches('/');
        if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        }
    }

    pub fn signing_region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_SIGNING_REGION)
    }
}
