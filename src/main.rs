//! VAP MCP Proxy
//!
#![doc = "VAP MCP Proxy"]
#![doc = "Main entry point: serves MCP over stdio or HTTP and forwards to the VAP API."]

use std::sync::Arc;

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vap_mcp_proxy::cli::{Cli, Mode};
use vap_mcp_proxy::config::Config;
use vap_mcp_proxy::mcp::dispatcher::Dispatcher;
use vap_mcp_proxy::mcp::transport::{http, stdio::StdioServer};
use vap_mcp_proxy::remote::http::HttpRemote;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let config = Config::from_env();

    init_tracing(cli.verbose || config.debug);

    config.validate()?;

    tracing::info!("API URL: {}", config.api_url);
    if config.has_api_key() {
        tracing::info!("API Key: configured");
    } else {
        tracing::warn!("API Key: NOT SET (set VAP_API_KEY)");
    }

    let remote = HttpRemote::new(&config)?;
    let dispatcher = Dispatcher::new(Arc::new(remote));

    match cli.mode {
        Mode::Stdio => {
            tracing::info!("Starting VAP MCP Proxy (stdio)");
            StdioServer::new(dispatcher).run().await?;
        }
        Mode::Http => {
            tracing::info!("Starting VAP MCP Proxy (http)");
            http::serve(dispatcher, cli.port).await?;
        }
    }

    Ok(())
}

/// Initialize tracing subscriber with environment filter
///
/// Output goes to stderr; stdout belongs to the stdio transport.
fn init_tracing(debug: bool) {
    let default_directive = if debug {
        "vap_mcp_proxy=debug"
    } else {
        "vap_mcp_proxy=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
