//! MCP server side of the proxy
//!
//! This module accepts Model Context Protocol JSON-RPC messages from a
//! client and answers them by forwarding to the remote VAP API.
//!
//! # Module Layout
//!
//! - `types`      -- JSON-RPC 2.0 primitives and the MCP types the proxy builds
//! - `dispatcher` -- method routing and envelope construction
//! - `transport`  -- stdio and HTTP front-ends

pub mod dispatcher;
pub mod transport;
pub mod types;

pub use dispatcher::{Dispatcher, Method};
pub use types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
