//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration and the tool catalog, and starts
//! the server on the configured transport.

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use chatvolt_mcp_server::core::{Config, LoggingConfig, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // `.env` must be loaded before the log level is read
    dotenvy::dotenv().ok();
    init_logging(&LoggingConfig::from_env());

    let config = Config::from_env();

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!("API base URL: {}", config.api.base_url);

    let server = McpServer::new(config.clone())
        .inspect_err(|e| error!("Failed to load the tool catalog: {}", e))?;

    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr; on STDIO, stdout belongs to the protocol.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::from_default_env().add_directive(logging.tracing_level().into());

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
