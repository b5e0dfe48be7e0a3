//! Errors returned by [`crate::sdk::VapClient`]

use serde_json::Value;
use thiserror::Error;

/// Failure of an SDK call.
///
/// HTTP failures are classified by status code; each variant carries the
/// status and the decoded response body (or `{"error": <text>}` when the
/// body was not JSON).
#[derive(Error, Debug)]
pub enum SdkError {
    /// 401 Unauthorized
    #[error("Authentication failed")]
    Authentication { status: u16, body: Value },

    /// 402 Payment Required
    #[error("Insufficient balance")]
    InsufficientBalance { status: u16, body: Value },

    /// 429 Too Many Requests
    #[error("Rate limit exceeded")]
    RateLimit { status: u16, body: Value },

    /// 400 Bad Request
    #[error("Validation error")]
    Validation { status: u16, body: Value },

    /// Any 5xx
    #[error("Server error")]
    Server { status: u16, body: Value },

    /// Any other non-200 status
    #[error("Request failed: {status}")]
    Request { status: u16, body: Value },

    /// Transport failure (connect, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The client could not be constructed
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl SdkError {
    /// Classify a non-200 response.
    pub fn from_status(status: u16, body: Value) -> Self {
        match status {
            401 => Self::Authentication { status, body },
            402 => Self::InsufficientBalance { status, body },
            429 => Self::RateLimit { status, body },
            400 => Self::Validation { status, body },
            s if s >= 500 => Self::Server { status, body },
            _ => Self::Request { status, body },
        }
    }

    /// HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::InsufficientBalance { status, .. }
            | Self::RateLimit { status, .. }
            | Self::Validation { status, .. }
            | Self::Server { status, .. }
            | Self::Request { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Config(_) => None,
        }
    }

    /// Decoded response body, when the failure came from a response.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Authentication { body, .. }
            | Self::InsufficientBalance { body, .. }
            | Self::RateLimit { body, .. }
            | Self::Validation { body, .. }
            | Self::Server { body, .. }
            | Self::Request { body, .. } => Some(body),
            Self::Http(_) | Self::Config(_) => None,
        }
    }
}
