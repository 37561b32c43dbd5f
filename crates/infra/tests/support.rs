//! Shared fixtures for the infra integration tests

#![allow(dead_code)]

use std::sync::Arc;

use scribe_mi_common::{init_tracing, TracingOptions};
use scribe_mi_core::testing::{MockIdentityProvider, MockRequestSigner};
use scribe_mi_domain::{CredentialInput, Environment};
use scribe_mi_infra::MiClient;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Financial statement model used as download content
pub const FINANCIALS_MODEL: &str = r#"{"company":"EXAMPLE CO LTD","dateReporting":"2024-01-01","covering":"year","items":[]}"#;

/// Client bound to a mock server, plus the mocks behind its session
pub struct TestClient {
    pub client: MiClient,
    pub identity: Arc<MockIdentityProvider>,
    pub signer: Arc<MockRequestSigner>,
}

impl TestClient {
    /// Bearer-mode client (no identity pool configured)
    pub fn bearer(server: &MockServer, identity: MockIdentityProvider) -> Self {
        Self::build(Environment::new(server.uri(), "eu-west-2_pool", "client"), identity)
    }

    /// Signed-mode client (identity pool configured)
    pub fn signed(server: &MockServer, identity: MockIdentityProvider) -> Self {
        let environment = Environment::new(server.uri(), "eu-west-2_pool", "client")
            .with_identity_pool("eu-west-2:pool");
        Self::build(environment, identity)
    }

    fn build(environment: Environment, identity: MockIdentityProvider) -> Self {
        // Later calls find the subscriber installed and leave it alone.
        let _ = init_tracing(TracingOptions::default().with_default_filter("scribe_mi_infra=debug"));

        let identity = Arc::new(identity);
        let signer = Arc::new(MockRequestSigner::new());
        let client = MiClient::builder()
            .environment(environment)
            .identity(identity.clone())
            .signer(signer.clone())
            .build()
            .expect("client should build");
        Self { client, identity, signer }
    }

    pub async fn login(&self) {
        self.client
            .authenticate(CredentialInput::username_password("analyst", "secret"))
            .await
            .expect("login should succeed");
    }
}

pub fn task_json(jobid: &str, status: &str) -> Value {
    json!({
        "jobid": jobid,
        "client": "Scribe",
        "companyName": "EXAMPLE CO LTD",
        "status": status,
        "submitted": 1_704_067_200
    })
}

pub fn task_with_model(jobid: &str, model_url: &str) -> Value {
    let mut task = task_json(jobid, "SUCCESS");
    task["modelUrl"] = Value::String(model_url.to_string());
    task
}
