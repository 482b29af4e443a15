/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - In-memory application wiring with a running insight worker
/// - Test user/tenant registration
/// - Request helpers returning status and parsed JSON body

use axum::body::Body;
use axum::http::{Request, StatusCode};
use revintel_api::app::{bootstrap, build_router};
use revintel_api::config::Config;
use revintel_shared::ids::SequentialIdGenerator;
use revintel_shared::store::Stores;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const PASSWORD: &str = "CorrectHorse9!";

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub config: Config,
    pub stores: Stores,
    pub worker_shutdown: CancellationToken,
}

/// A registered user and its token
#[allow(dead_code)]
pub struct TestUser {
    pub email: String,
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub token: String,
}

#[allow(dead_code)]
impl TestUser {
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[allow(dead_code)]
impl TestContext {
    /// Creates a context with the default insight delay
    pub async fn new() -> Self {
        Self::with_config(Config::for_testing(JWT_SECRET))
    }

    /// Creates a context with a short insight delay
    pub async fn with_insight_delay(delay_ms: u64) -> Self {
        let mut config = Config::for_testing(JWT_SECRET);
        config.insights.delay_ms = delay_ms;
        Self::with_config(config)
    }

    fn with_config(config: Config) -> Self {
        let stores = Stores::in_memory();
        let services = bootstrap(
            config.clone(),
            stores.clone(),
            Arc::new(SequentialIdGenerator::new()),
        );

        let worker_shutdown = services.worker.shutdown_token();
        tokio::spawn(services.worker.run(services.receiver));

        Self {
            app: build_router(services.state),
            config,
            stores,
            worker_shutdown,
        }
    }

    /// Sends a request and returns the status with the parsed body
    ///
    /// The body is `Value::Null` when empty or not JSON.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, body)
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.send("GET", uri, Some(&user.auth_header()), None).await
    }

    pub async fn post(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(&user.auth_header()), Some(body))
            .await
    }

    /// Registers a fresh user in its own tenant
    pub async fn register(&self, email: &str) -> TestUser {
        let (status, body) = self
            .send(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": PASSWORD,
                    "firstName": "Test",
                    "lastName": "User",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        TestUser {
            email: email.to_string(),
            user_id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            tenant_id: body["user"]["tenant_id"].as_str().unwrap().parse().unwrap(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.worker_shutdown.cancel();
    }
}
