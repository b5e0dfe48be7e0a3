//! Inbound transports
//!
//! Two alternative front-ends feed the same [`crate::mcp::dispatcher::Dispatcher`]:
//!
//! - [`stdio::StdioServer`] -- newline-delimited JSON-RPC over the process's
//!   stdin/stdout, for desktop assistants that spawn the proxy.
//! - [`http::serve`] -- JSON-RPC over HTTP POST with a health endpoint and
//!   CORS, for browser-based inspectors.
//!
//! Both decode one message at a time, dispatch it, and write back exactly
//! one response for a request and nothing for a notification. The HTTP
//! transport answers notifications with `{"status":"ok"}` so that the HTTP
//! exchange itself stays well-formed.

pub mod http;
pub mod stdio;
