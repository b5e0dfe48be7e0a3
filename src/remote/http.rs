//! HTTP implementation of [`RemoteApi`]
//!
//! [`HttpRemote`] speaks JSON over HTTP(S) to both VAP endpoints. Every
//! request carries `Content-Type: application/json` and, when an API key is
//! configured, `Authorization: Bearer <key>`. Each call applies its own
//! timeout; there are no retries.
//!
//! # Error extraction
//!
//! For task-creation POSTs the server reports failures such as insufficient
//! balance as `{"detail": {"message": "..."}}` or `{"detail": "..."}`. That
//! message is surfaced in preference to the status line. Bodies that are
//! not JSON fall back to their raw text, cut to 500 characters.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::config::{Config, MCP_POST_TIMEOUT, TASK_GET_TIMEOUT, TASK_POST_TIMEOUT};
use crate::error::{ProxyError, Result};
use crate::remote::{truncate, RemoteApi, RemoteError, RemoteResult};

/// Maximum characters of a raw error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Maximum characters of a request payload written to debug logs.
const MAX_LOGGED_PAYLOAD_CHARS: usize = 1000;

/// Remote API client backed by `reqwest`.
///
/// # Examples
///
/// ```no_run
/// use vap_mcp_proxy::config::Config;
/// use vap_mcp_proxy::remote::http::HttpRemote;
///
/// let remote = HttpRemote::new(&Config::default()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    api_url: String,
    api_base_url: String,
    api_key: Option<String>,
}

impl HttpRemote {
    /// Construct a client for the endpoints named in `config`.
    ///
    /// No network I/O is performed at construction time.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Http`] if the underlying client cannot be built
    /// (TLS backend initialisation failure).
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ProxyError::Http)?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: Method, url: &str, timeout: Duration) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, url)
            .timeout(timeout)
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    async fn decode(response: reqwest::Response) -> RemoteResult {
        response
            .json::<Value>()
            .await
            .map_err(|e| RemoteError::new(e.to_string()))
    }
}

#[async_trait::async_trait]
impl RemoteApi for HttpRemote {
    async fn post_mcp(&self, endpoint: &str, payload: Option<Value>) -> RemoteResult {
        let url = format!("{}{}", self.api_url, endpoint);
        let payload = payload.unwrap_or_else(|| Value::Object(Default::default()));

        tracing::debug!("Request: POST {}", url);
        tracing::debug!("Payload: {}", truncate(&payload.to_string(), MAX_LOGGED_PAYLOAD_CHARS));

        let result = async {
            let response = self
                .request(Method::POST, &url, MCP_POST_TIMEOUT)
                .json(&payload)
                .send()
                .await
                .map_err(|e| RemoteError::new(e.to_string()))?;
            let response = response
                .error_for_status()
                .map_err(|e| RemoteError::new(e.to_string()))?;
            Self::decode(response).await
        }
        .await;

        if let Err(e) = &result {
            tracing::error!("HTTP error: {}", e);
        }
        result
    }

    async fn post_v3(&self, endpoint: &str, payload: Option<Value>) -> RemoteResult {
        let url = format!("{}{}", self.api_base_url, endpoint);
        let payload = payload.unwrap_or_else(|| Value::Object(Default::default()));

        tracing::debug!("V3 Request: POST {}", url);
        tracing::debug!("Payload: {}", truncate(&payload.to_string(), MAX_LOGGED_PAYLOAD_CHARS));

        let result = async {
            let response = self
                .request(Method::POST, &url, TASK_POST_TIMEOUT)
                .json(&payload)
                .send()
                .await
                .map_err(|e| RemoteError::new(e.to_string()))?;

            let status = response.status();
            let status_error = response.error_for_status_ref().err();
            if let Some(status_error) = status_error {
                let generic = status_error.to_string();
                let body = response.text().await.unwrap_or_default();
                return Err(RemoteError::new(extract_error_detail(status, &body, generic)));
            }
            Self::decode(response).await
        }
        .await;

        if let Err(e) = &result {
            tracing::error!("V3 HTTP error: {}", e);
        }
        result
    }

    async fn get_v3(&self, endpoint: &str) -> RemoteResult {
        let url = format!("{}{}", self.api_base_url, endpoint);

        tracing::debug!("V3 GET Request: {}", url);

        let result = async {
            let response = self
                .request(Method::GET, &url, TASK_GET_TIMEOUT)
                .send()
                .await
                .map_err(|e| RemoteError::new(e.to_string()))?;
            let response = response
                .error_for_status()
                .map_err(|e| RemoteError::new(e.to_string()))?;
            Self::decode(response).await
        }
        .await;

        if let Err(e) = &result {
            tracing::error!("V3 GET error: {}", e);
        }
        result
    }
}

/// Pick the most specific message out of a failed task-API response body.
///
/// Order of preference:
/// 1. `detail.message` when `detail` is an object with a string `message`
/// 2. `detail` serialized when it is an object without one
/// 3. `detail` itself when it is a string
/// 4. the whole JSON body when it is an object without a usable `detail`
/// 5. the raw body text, cut to 500 characters
/// 6. `generic` when the body is empty or JSON but not an object
fn extract_error_detail(status: StatusCode, body: &str, generic: String) -> String {
    tracing::debug!("Task API returned {} with body: {}", status, truncate(body, MAX_ERROR_BODY_CHARS));

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::Object(detail)) => match detail.get("message") {
                Some(Value::String(message)) => message.clone(),
                _ => Value::Object(detail.clone()).to_string(),
            },
            Some(Value::String(detail)) => detail.clone(),
            _ => Value::Object(map).to_string(),
        },
        Ok(_) => generic,
        Err(_) if body.is_empty() => generic,
        Err(_) => truncate(body, MAX_ERROR_BODY_CHARS),
    }
}
