//! Command-line interface definition for the VAP MCP proxy
//!
//! The proxy takes no subcommands: the transport is picked with `--mode`
//! and everything else comes from the environment (see [`crate::config`]).

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_PORT;

/// VAP MCP Proxy - bridges MCP clients to the VAP media API
#[derive(Parser, Debug, Clone)]
#[command(name = "vap-mcp-proxy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Transport to serve MCP on
    #[arg(long, value_enum, default_value_t = Mode::Stdio)]
    pub mode: Mode,

    /// Port for HTTP mode
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Inbound transport selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// JSON-RPC over HTTP POST
    Http,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
