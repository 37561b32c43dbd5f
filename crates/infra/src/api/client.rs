//! MI API client
//!
//! Dispatches schema-validated requests through the session transport and
//! exposes the task endpoints. File transfers live in `api::transfer`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use scribe_mi_core::{
    IdentityProvider, RequestSigner, SessionManager, SignableRequest, SigningScope,
    TransportStrategy,
};
use scribe_mi_domain::constants::{
    CONTENT_TYPE_JSON, FUND_PORTFOLIO_PATH, JOBID_SEPARATOR, TASKS_PATH,
};
use scribe_mi_domain::{
    ConsolidatedModelResponse, CredentialInput, DeploymentMode, Environment, ListTasksResponse,
    MiError, ModelFundPerformance, Result, Task, Validate,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::errors::normalize_failure;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Method, extra headers and body of an endpoint call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self { method: Method::GET, headers: Vec::new(), body: None }
    }

    pub fn delete() -> Self {
        Self { method: Method::DELETE, ..Self::get() }
    }

    /// POST with a JSON body
    ///
    /// # Errors
    /// `Internal` if the body cannot be serialized.
    pub fn post_json<T: Serialize>(body: &T) -> Result<Self> {
        let body = serde_json::to_vec(body)
            .map_err(|e| MiError::Internal(format!("Failed to serialize body: {e}")))?;
        Ok(Self {
            method: Method::POST,
            headers: vec![(CONTENT_TYPE.as_str().to_string(), CONTENT_TYPE_JSON.to_string())],
            body: Some(body),
        })
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Client for one MI environment and one authenticated session
pub struct MiClient {
    pub(crate) http: HttpClient,
    session: Arc<SessionManager>,
    base_url: String,
}

impl MiClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> MiClientBuilder {
        MiClientBuilder::default()
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Establish the session with a username/password pair or refresh token
    ///
    /// # Errors
    /// See [`SessionManager::authenticate`].
    pub async fn authenticate(&self, input: CredentialInput) -> Result<()> {
        self.session.authenticate(input).await
    }

    /// Renew the session with the stored refresh token
    ///
    /// # Errors
    /// See [`SessionManager::reauthenticate`].
    pub async fn reauthenticate(&self) -> Result<()> {
        self.session.reauthenticate().await
    }

    /// Call an API endpoint and validate the response
    ///
    /// Renews an expired session once before dispatching. Only status 200
    /// counts as success.
    ///
    /// # Errors
    /// - `NotAuthenticated` before `authenticate`
    /// - `SchemaValidation` when a 200 body does not match `T`
    /// - `Api` / `Unknown` for any other status
    /// - renewal, signing and network failures
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn call_endpoint<T>(&self, path: &str, options: RequestOptions) -> Result<T>
    where
        T: DeserializeOwned + Validate,
    {
        let transport = self.session.ensure_fresh().await?;

        let url = format!("{}{}", self.base_url, path);
        let RequestOptions { method, headers, body } = options;
        let signable = SignableRequest {
            method: method.as_str().to_string(),
            url: url.clone(),
            headers,
            body: body.unwrap_or_default(),
        };
        let authorization = transport.authorize(&signable)?;

        let mut request = self.http.request(method, &url);
        for (name, value) in signable.headers.iter().chain(&authorization) {
            request = request.header(name.as_str(), value.as_str());
        }
        if !signable.body.is_empty() {
            request = request.body(signable.body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(InfraError::from)?;

        if status != StatusCode::OK {
            debug!(%status, "API call failed");
            return Err(normalize_failure(status.as_u16(), &body));
        }

        parse_response(&body)
    }

    /// List tasks, optionally for one company, with pre-signed model URLs
    ///
    /// # Errors
    /// See [`MiClient::call_endpoint`].
    pub async fn list_tasks(&self, company: Option<&str>) -> Result<Vec<Task>> {
        let mut path = format!("{TASKS_PATH}?includePresigned=true");
        if let Some(company) = company.filter(|c| !c.is_empty()) {
            path.push_str("&company=");
            path.push_str(&urlencoding::encode(company));
        }
        let ListTasksResponse { tasks } = self.call_endpoint(&path, RequestOptions::get()).await?;
        debug!(count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// # Errors
    /// See [`MiClient::call_endpoint`].
    pub async fn get_task(&self, jobid: &str) -> Result<Task> {
        self.call_endpoint(&task_path(jobid), RequestOptions::get()).await
    }

    /// Consolidate fund-performance tasks into one portfolio model
    ///
    /// # Errors
    /// See [`MiClient::call_endpoint`].
    pub async fn consolidate_tasks(&self, tasks: &[Task]) -> Result<ModelFundPerformance> {
        let jobids =
            tasks.iter().map(|task| task.jobid.as_str()).collect::<Vec<_>>().join(JOBID_SEPARATOR);
        let path = format!("{FUND_PORTFOLIO_PATH}?jobids={}", urlencoding::encode(&jobids));
        let ConsolidatedModelResponse { model } =
            self.call_endpoint(&path, RequestOptions::get()).await?;
        Ok(model)
    }

    /// Delete a task, returning the record as the API reports it afterwards
    ///
    /// # Errors
    /// See [`MiClient::call_endpoint`].
    pub async fn delete_task(&self, task: &Task) -> Result<Task> {
        let deleted: Task =
            self.call_endpoint(&task_path(&task.jobid), RequestOptions::delete()).await?;
        info!(jobid = %deleted.jobid, status = ?deleted.status, "Task deleted");
        Ok(deleted)
    }
}

fn task_path(jobid: &str) -> String {
    format!("{TASKS_PATH}/{}", urlencoding::encode(jobid))
}

fn parse_response<T>(body: &[u8]) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T =
        serde_json::from_slice(body).map_err(|e| MiError::SchemaValidation(e.to_string()))?;
    parsed.validate()?;
    Ok(parsed)
}

/// Builder for [`MiClient`]
#[derive(Default)]
pub struct MiClientBuilder {
    environment: Option<Environment>,
    identity: Option<Arc<dyn IdentityProvider>>,
    signer: Option<Arc<dyn RequestSigner>>,
    http: Option<HttpClient>,
    timeout: Option<Duration>,
}

impl MiClientBuilder {
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set the identity provider
    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Set the request signer (required when an identity pool is configured)
    pub fn signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Request timeout for the default HTTP client
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client
    ///
    /// # Errors
    /// `Config` if the environment is missing or invalid, the identity
    /// provider is missing, or a federated environment has no signer.
    pub fn build(self) -> Result<MiClient> {
        let environment =
            self.environment.ok_or_else(|| MiError::Config("Environment not set".to_string()))?;
        environment.validate()?;
        let identity = self
            .identity
            .ok_or_else(|| MiError::Config("Identity provider not set".to_string()))?;

        let strategy = match environment.deployment_mode() {
            DeploymentMode::Federated => {
                let signer = self.signer.ok_or_else(|| {
                    MiError::Config(
                        "Request signer required when an identity pool is configured".to_string(),
                    )
                })?;
                TransportStrategy::signed(
                    signer,
                    SigningScope::for_region(environment.signing_region()),
                )
            }
            DeploymentMode::Bearer => TransportStrategy::Bearer,
        };

        let http = match (self.http, self.timeout) {
            (Some(http), _) => http,
            (None, Some(timeout)) => HttpClient::builder().timeout(timeout).build()?,
            (None, None) => HttpClient::new()?,
        };

        debug!(base_url = %environment.base_url(), transport = strategy.name(), "MI client built");

        Ok(MiClient {
            http,
            session: Arc::new(SessionManager::new(identity, strategy)),
            base_url: environment.base_url(),
        })
    }
}
