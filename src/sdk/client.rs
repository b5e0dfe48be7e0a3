//! Typed client for the VAP REST API

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::error::SdkError;
use super::models::{Balance, GenerateResult, HealthStatus};
use crate::config::DEFAULT_API_BASE_URL;

/// Default request timeout for SDK calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Thin typed wrapper over the VAP REST endpoints.
///
/// # Examples
///
/// ```no_run
/// use vap_mcp_proxy::sdk::VapClient;
///
/// # async fn run() -> Result<(), vap_mcp_proxy::sdk::SdkError> {
/// let client = VapClient::new("sk-test")?;
/// let balance = client.get_balance().await?;
/// println!("{} {}", balance.balance, balance.currency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct VapClient {
    client: reqwest::Client,
    base_url: String,
}

/// Builder for [`VapClient`].
#[derive(Debug, Clone)]
pub struct VapClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl VapClientBuilder {
    /// Override the base URL. A trailing `/` is ignored.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] if the API key cannot be used as a
    /// header value, or [`SdkError::Http`] if the HTTP client fails to build.
    pub fn build(self) -> Result<VapClient, SdkError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| SdkError::Config(format!("invalid API key: {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("vap-client-rust/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        Ok(VapClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl VapClient {
    /// Create a client against the default base URL.
    pub fn new(api_key: &str) -> Result<Self, SdkError> {
        Self::builder(api_key).build()
    }

    /// Start building a client with non-default settings.
    pub fn builder(api_key: &str) -> VapClientBuilder {
        VapClientBuilder {
            api_key: api_key.to_string(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus, SdkError> {
        self.get("/health").await
    }

    /// `POST /v3/generate` for an image.
    pub async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: &str,
        style: Option<&str>,
    ) -> Result<GenerateResult, SdkError> {
        let mut body = json!({
            "prompt": prompt,
            "aspect_ratio": aspect_ratio,
        });
        if let Some(style) = style {
            body["style"] = json!(style);
        }
        self.post("/v3/generate", &body).await
    }

    /// `GET /v3/balance`
    pub async fn get_balance(&self) -> Result<Balance, SdkError> {
        self.get("/v3/balance").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("SDK GET {}", url);
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, SdkError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("SDK POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SdkError> {
        let status = response.status();
        if status.as_u16() == 200 {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| json!({ "error": text }));
        tracing::warn!("SDK request failed with status {}", status.as_u16());
        Err(SdkError::from_status(status.as_u16(), body))
    }
}
