//! Error types for the VAP MCP proxy
//!
//! This module defines the application-level error type, using `thiserror`
//! for ergonomic error handling. Remote API failures have their own type in
//! [`crate::remote::RemoteError`] because they are reported to callers as
//! tool results rather than propagated.

use thiserror::Error;

/// Main error type for proxy operations
///
/// These errors cover startup (configuration), transport I/O, and the
/// serialization of JSON-RPC envelopes. None of them ever reach a JSON-RPC
/// client directly: the dispatcher and transports convert them into error
/// envelopes first.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level errors (stdio loop, HTTP listener)
    #[error("Transport error: {0}")]
    Transport(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for proxy operations
///
/// Uses `anyhow::Error` so that call sites can attach context while still
/// carrying a [`ProxyError`] underneath.
pub type Result<T> = anyhow::Result<T>;
