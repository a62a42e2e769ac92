//! HTTP client for the gateway admin API
//!
//! Wraps `reqwest` for the `/apis` endpoints and implements the lookup and
//! executor collaborators used by the reconciler. Read failures become
//! `Error::Lookup`, write failures `Error::Execution`.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

use crate::domain::{ApiListing, ApiRecord, ApiSpec, ApiSummary};
use crate::errors::{Error, Result};
use crate::reconcile::{ApiExecutor, ApiLookup};

/// Default admin endpoint of a local gateway
pub const DEFAULT_ADMIN_URL: &str = "http://127.0.0.1:8001";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the gateway admin API (e.g., "http://127.0.0.1:8001")
    pub admin_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Enable verbose request/response logging
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { admin_url: DEFAULT_ADMIN_URL.to_string(), timeout: 30, verbose: false }
    }
}

/// Which side of the error taxonomy a failed request lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Lookup,
    Execution,
}

impl Phase {
    fn failed<O: Into<String>>(self, operation: O, status: Option<u16>, message: String) -> Error {
        match (self, status) {
            (Phase::Lookup, Some(status)) => Error::lookup_status(operation, status, message),
            (Phase::Lookup, None) => Error::lookup(operation, message),
            (Phase::Execution, Some(status)) => Error::execution_status(operation, status, message),
            (Phase::Execution, None) => Error::execution(operation, message),
        }
    }
}

/// Client for the gateway admin API
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    config: ClientConfig,
}

impl GatewayClient {
    /// Create a new client with the given configuration
    pub fn new(mut config: ClientConfig) -> Result<Self> {
        Url::parse(&config.admin_url).map_err(|e| {
            Error::config(format!("Invalid admin URL '{}': {}", config.admin_url, e))
        })?;
        config.admin_url = config.admin_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the admin URL
    pub fn admin_url(&self) -> &str {
        &self.config.admin_url
    }

    /// Build a request against the admin API
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.admin_url, path);
        debug!("{} {}", method, url);

        self.client.request(method, &url)
    }

    /// URL of a single registration; `id` is percent-encoded as one path segment
    pub fn api_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.admin_url).map_err(|e| {
            Error::config(format!("Invalid admin URL '{}': {}", self.config.admin_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("Admin URL '{}' cannot carry a path", self.config.admin_url)))?
            .pop_if_empty()
            .push("apis")
            .push(id);

        Ok(url)
    }

    fn api_request(&self, method: Method, id: &str) -> Result<RequestBuilder> {
        let url = self.api_url(id)?;
        debug!("{} {}", method, url);

        Ok(self.client.request(method, url))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        phase: Phase,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| phase.failed(operation, None, format!("Failed to send request: {}", e)))?;

        let body = self.read_success(phase, operation, response).await?;

        serde_json::from_str(&body).map_err(|e| {
            phase.failed(operation, None, format!("Failed to deserialize response: {}: {}", e, body))
        })
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
        body: &B,
    ) -> Result<T> {
        if self.config.verbose {
            let body_json = serde_json::to_string_pretty(body)
                .unwrap_or_else(|_| "<unable to serialize>".to_string());
            trace!("Request body:\n{}", body_json);
        }

        self.send(Phase::Execution, operation, request.json(body)).await
    }

    /// Check status and return the body text of a successful response
    async fn read_success(&self, phase: Phase, operation: &str, response: Response) -> Result<String> {
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let error_text =
                response.text().await.unwrap_or_else(|_| "<unable to read error>".to_string());

            if self.config.verbose {
                trace!("Error response:\n{}", error_text);
            }

            return Err(phase.failed(operation, Some(status.as_u16()), error_text));
        }

        let body = response.text().await.map_err(|e| {
            phase.failed(operation, Some(status.as_u16()), format!("Failed to read response body: {}", e))
        })?;

        if self.config.verbose {
            trace!("Response body:\n{}", body);
        }

        Ok(body)
    }

    /// Fetch the first page of `GET /apis`
    pub async fn list_page(&self) -> Result<ApiListing> {
        self.send(Phase::Lookup, "list", self.request(Method::GET, "/apis")).await
    }
}

#[async_trait]
impl ApiLookup for GatewayClient {
    async fn list_apis(&self) -> Result<Vec<ApiSummary>> {
        Ok(self.list_page().await?.data)
    }

    async fn get_api(&self, id: &str) -> Result<ApiRecord> {
        let request = self.api_request(Method::GET, id)?;
        self.send(Phase::Lookup, "get", request).await
    }
}

#[async_trait]
impl ApiExecutor for GatewayClient {
    async fn create_api(&self, spec: &ApiSpec) -> Result<ApiRecord> {
        self.send_json("create", self.request(Method::POST, "/apis/"), spec).await
    }

    async fn update_api(&self, id: &str, spec: &ApiSpec) -> Result<ApiRecord> {
        let request = self.api_request(Method::PATCH, id)?;
        self.send_json("update", request, spec).await
    }

    async fn delete_api(&self, id: &str) -> Result<()> {
        let response = self.api_request(Method::DELETE, id)?.send().await.map_err(|e| {
            Error::execution("delete", format!("Failed to send request: {}", e))
        })?;

        self.read_success(Phase::Execution, "delete", response).await?;
        Ok(())
    }
}
