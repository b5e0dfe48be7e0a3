//! Stdio transport for desktop MCP clients
//!
//! This module implements [`StdioServer`], which reads newline-delimited
//! JSON-RPC messages from stdin and writes responses to stdout.
//!
//! # Protocol
//!
//! - Each non-blank input line is one JSON-RPC message; blank lines are
//!   skipped.
//! - Each response is written as a single JSON object followed by `\n` and
//!   flushed immediately.
//! - Notifications produce no output at all.
//! - A line that is not valid JSON is answered with a `-32700` parse error
//!   keyed to a `null` id, and the loop carries on with the next line.
//!
//! Messages are handled strictly one at a time: the next line is not read
//! until the current response has been written. All logging goes to stderr.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::Result;
use crate::mcp::dispatcher::Dispatcher;
use crate::mcp::types::JsonRpcResponse;
use crate::remote::truncate;

/// Maximum characters of an inbound or outbound line written to debug logs.
const MAX_LOGGED_LINE_CHARS: usize = 200;

/// Line-oriented JSON-RPC server.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vap_mcp_proxy::config::Config;
/// use vap_mcp_proxy::mcp::dispatcher::Dispatcher;
/// use vap_mcp_proxy::mcp::transport::stdio::StdioServer;
/// use vap_mcp_proxy::remote::http::HttpRemote;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let remote = HttpRemote::new(&Config::from_env())?;
/// StdioServer::new(Dispatcher::new(Arc::new(remote))).run().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StdioServer {
    dispatcher: Dispatcher,
}

impl StdioServer {
    /// Create a server that dispatches through `dispatcher`.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Serve the process's stdin/stdout until stdin is closed.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading stdin or writing stdout fails.
    pub async fn run(&self) -> Result<()> {
        tracing::info!("VAP MCP Proxy starting in stdio mode...");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve an arbitrary line reader and writer until the reader hits EOF.
    ///
    /// # Arguments
    ///
    /// * `reader` - Source of newline-delimited JSON-RPC messages
    /// * `writer` - Sink for newline-delimited responses
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O operation on either side fails.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let bytes_read = reader.read_until(b'\n', &mut buf).await?;
            if bytes_read == 0 {
                tracing::debug!("stdin closed, shutting down");
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            tracing::debug!("Received: {}...", truncate(line, MAX_LOGGED_LINE_CHARS));

            let response = match serde_json::from_str(line) {
                Ok(message) => self.dispatcher.dispatch_value(message).await,
                Err(e) => {
                    tracing::error!("Invalid JSON: {}", e);
                    Some(JsonRpcResponse::parse_error("Parse error"))
                }
            };

            if let Some(response) = response {
                write_response(&mut writer, &response).await?;
            }
        }

        Ok(())
    }
}

/// Write one response as a single line and flush it.
async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut output = serde_json::to_string(response)?;
    tracing::debug!("Sending: {}...", truncate(&output, MAX_LOGGED_LINE_CHARS));
    output.push('\n');
    writer.write_all(output.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
