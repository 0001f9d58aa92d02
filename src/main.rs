use anyhow::Result;
use clap::Parser;
use gsheets_mcp::config::{CliArgs, ServerConfig};
use gsheets_mcp::server::SheetsServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP transport; logs must go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = ServerConfig::from_args(args);

    let server = SheetsServer::new(config).await?;
    server.run().await
}
