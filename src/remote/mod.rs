//! Remote VAP API access
//!
//! This module defines the [`RemoteApi`] trait that every component uses to
//! reach the remote service, together with the [`RemoteError`] value that
//! all failures collapse into. Concrete implementations live in submodules:
//!
//! - [`http::HttpRemote`] -- authenticated JSON over HTTP via `reqwest`.
//! - `fake::FakeRemote` -- scripted in-process double (cfg(test) only).
//!
//! # Two endpoints
//!
//! The remote service exposes a tool-protocol endpoint (`/initialize`,
//! `/tools/list`, `/tools/call`, `/resources/*`) and a task endpoint
//! (`/v3/tasks`). Each has its own call shape and timeout.

use serde_json::Value;
use thiserror::Error;

pub mod http;

#[cfg(test)]
pub mod fake;

/// Path of the task-creation endpoint on the task base.
pub const TASKS_ENDPOINT: &str = "/v3/tasks";

/// A failed remote call, reduced to the most specific message available.
///
/// Transport failures, non-2xx statuses, and undecodable bodies all become a
/// `RemoteError`. Callers decide whether it surfaces as a JSON-RPC error or
/// as a flagged tool result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    /// Human-readable failure description
    pub message: String,
}

impl RemoteError {
    /// Create a new remote error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Render as the uniform `{"error": message}` shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use vap_mcp_proxy::remote::RemoteError;
    ///
    /// let v = RemoteError::new("boom").into_value();
    /// assert_eq!(v["error"], "boom");
    /// ```
    pub fn into_value(self) -> Value {
        serde_json::json!({ "error": self.message })
    }
}

/// Result of a single remote call.
pub type RemoteResult = std::result::Result<Value, RemoteError>;

/// Abstraction over the remote VAP service.
///
/// Implementations never panic and never return transport errors through
/// any other channel: every failure is a [`RemoteError`].
#[async_trait::async_trait]
pub trait RemoteApi: Send + Sync + std::fmt::Debug {
    /// POST `payload` to `endpoint` on the tool-protocol base.
    ///
    /// `None` is sent as an empty JSON object.
    async fn post_mcp(&self, endpoint: &str, payload: Option<Value>) -> RemoteResult;

    /// POST `payload` to `endpoint` on the task base.
    ///
    /// On HTTP failure the structured `detail` message from the response
    /// body is preferred over the generic status text.
    async fn post_v3(&self, endpoint: &str, payload: Option<Value>) -> RemoteResult;

    /// GET `endpoint` on the task base.
    async fn get_v3(&self, endpoint: &str) -> RemoteResult;
}

/// Truncate `text` to at most `max` characters for logging or display.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
