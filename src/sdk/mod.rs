//! Standalone client for the VAP REST API
//!
//! Independent of the MCP proxy: a small typed wrapper for scripts that
//! want to talk to the service directly.

pub mod client;
pub mod error;
pub mod models;

pub use client::{VapClient, VapClientBuilder};
pub use error::SdkError;
pub use models::{Balance, GenerateResult, HealthStatus};
