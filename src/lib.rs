//! VAP MCP Proxy - protocol translation between MCP clients and the VAP API
//!
//! The proxy speaks the Model Context Protocol (JSON-RPC 2.0) to a local
//! assistant and forwards each request to the remote VAP media service.
//! A few tools are handled locally: `generate_video` and `get_task` talk to
//! the REST task API directly and `estimate_video_cost` never leaves the
//! process.
//!
//! # Architecture
//!
//! - `mcp`: JSON-RPC types, the method dispatcher and the stdio/HTTP transports
//! - `tools`: locally-implemented tools and the forwarding fallback
//! - `remote`: the outbound HTTP client for the VAP API
//! - `sdk`: a standalone typed REST client
//! - `config`: environment-driven configuration
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vap_mcp_proxy::{Config, Dispatcher};
//! use vap_mcp_proxy::remote::http::HttpRemote;
//! use vap_mcp_proxy::mcp::transport::stdio::StdioServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     config.validate()?;
//!
//!     let dispatcher = Dispatcher::new(Arc::new(HttpRemote::new(&config)?));
//!     StdioServer::new(dispatcher).run().await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod remote;
pub mod sdk;
pub mod tools;

// Re-export commonly used types
pub use config::Config;
pub use error::{ProxyError, Result};
pub use mcp::{Dispatcher, JsonRpcError, JsonRpcRequest, JsonRpcResponse, Method};
pub use remote::{RemoteApi, RemoteError};
