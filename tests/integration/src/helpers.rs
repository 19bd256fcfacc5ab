//! Test helpers for integration tests
//!
//! Provides a server handle bound to an ephemeral port plus a few request
//! and assertion shortcuts.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use reqwest::{multipart::Form, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracker_api::{build_app, AppState};
use tracker_common::AppConfig;
use tracker_service::testing::MemoryBackend;
use tracker_service::{ServiceContext, ServiceSettings};

use crate::fixtures::ErrorResponse;

/// API prefix every non-health route lives under
pub const API: &str = "/api/v1";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub backend: MemoryBackend,
    pub context: ServiceContext,
    pub config: AppConfig,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the default test configuration
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start a server with extra environment-style settings layered on top
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self> {
        let config = test_config(overrides)?;
        let backend = MemoryBackend::new()?;
        let context = backend.context(ServiceSettings::from_config(&config));
        let app = build_app(context.clone(), config.clone());

        let (addr, handle) = serve(app).await?;

        Ok(Self {
            addr,
            client: test_client()?,
            backend,
            context,
            config,
            _handle: handle,
        })
    }

    /// Serve a custom router over the same backend
    ///
    /// The router gets an `AppState` built from this server's context.
    pub async fn spawn_router(&self, router: Router<AppState>) -> Result<String> {
        let state = AppState::new(self.context.clone(), self.config.clone());
        let (addr, _handle) = serve(router.with_state(state)).await?;
        Ok(format!("http://{addr}"))
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with a bearer token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        self.get_with_authorization(path, &format!("Bearer {token}"))
            .await
    }

    /// Make a GET request with a raw `Authorization` value
    pub async fn get_with_authorization(&self, path: &str, value: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .header("Authorization", value)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a multipart POST request with a bearer token
    pub async fn post_form_auth(&self, path: &str, token: &str, form: Form) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await?)
    }
}

async fn serve(app: Router) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok((addr, handle))
}

fn test_client() -> Result<Client> {
    Ok(Client::builder().timeout(Duration::from_secs(10)).build()?)
}

/// Create a test configuration
///
/// The database URL is a placeholder; the in-memory backend never dials it.
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("DATABASE_URL", "postgres://unused@localhost/unused"),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000"),
        ("RATE_LIMIT_BURST", "1000"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_lookup(|key: &str| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert an error response and return its machine code
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: ErrorResponse = assert_json(response, expected_status).await?;
    Ok(body.error.code)
}
