//! Database metadata MCP server - Main entry point.
//!
//! Serves table metadata for the configured connections and the migration
//! prompts over stdio or HTTP.

use clap::Parser;
use db_metadata_mcp::config::{Command, Config, TransportMode};
use db_metadata_mcp::db::{ConnectionResolver, SqlxConnector};
use db_metadata_mcp::settings::{SettingsLoader, global_settings_path, init_settings};
use db_metadata_mcp::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr: stdout carries the stdio transport.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }
}

fn run_init(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = global_settings_path().ok_or("Could not determine the home directory")?;
    init_settings(&path, force)?;
    eprintln!("Settings written to {}", path.display());
    eprintln!("Edit databaseConnections to point at your databases.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    init_tracing(&config);

    if let Some(Command::Init { force }) = config.command {
        return run_init(force);
    }

    info!(
        transport = %config.transport,
        "Starting database metadata MCP server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let loader = SettingsLoader::new(config.config.clone());
    debug!(sources = ?loader.sources(), "Loading settings");
    let connections = match loader.load() {
        Ok(Some(settings)) => settings.into_descriptors(),
        Ok(None) => {
            warn!("No settings found; run `db-metadata-mcp init` to create one");
            Vec::new()
        }
        Err(e) => {
            warn!(error = %e, "Invalid settings, serving without connections");
            Vec::new()
        }
    };

    let connector = SqlxConnector::new(config.connect_timeout_duration());
    let connect_timeout = connector.connect_timeout();
    let resolver = Arc::new(ConnectionResolver::new(connections, connector));
    info!(
        connections = ?resolver.connection_names(),
        connect_timeout = ?connect_timeout,
        "Connections configured"
    );

    let result = match config.transport {
        TransportMode::Stdio => {
            let transport = StdioTransport::new(resolver);
            info!(transport = transport.name(), "Using stdio transport");
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                bind = %config.http_bind_addr(),
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                resolver,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
