//! InvertirOnline MCP server entry point.
//!
//! Loads configuration from the environment (and `.env`), then serves the
//! brokerage tools over stdio until the peer disconnects.

mod params;
mod response;
mod server;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use iolmcp_core::{Config, IolClient};
use rmcp::ServiceExt;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::server::IolMcpServer;

const LOG_FILE_NAME: &str = "iol_mcp.log";

/// Log to stderr (stdout carries the MCP transport) and, when a directory
/// is available, to a plain-text log file. The returned guard flushes the
/// file writer on drop.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // RUST_LOG controls the level (e.g., RUST_LOG=iolmcp_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn prepare_log_dir(config: &Config) -> Result<std::path::PathBuf> {
    let dir = config.log_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    Ok(dir)
}

async fn run(config: Config) -> Result<()> {
    info!(base_url = %config.base_url, "Starting InvertirOnline MCP server");

    let client = IolClient::new(&config).context("Failed to build HTTP client")?;
    let service = IolMcpServer::new(client)
        .serve((tokio::io::stdin(), tokio::io::stdout()))
        .await
        .context("Failed to start MCP service")?;

    info!("MCP server running on stdio");
    let _quit_reason = service.waiting().await.context("MCP service terminated abnormally")?;
    info!("MCP server stopped");

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            init_tracing(None);
            error!(%err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let log_dir = prepare_log_dir(&config);
    let guard = init_tracing(log_dir.as_deref().ok());
    if let Err(err) = &log_dir {
        warn!("File logging disabled: {:#}", err);
    }

    if let Err(err) = run(config).await {
        error!("Fatal error: {:#}", err);
        drop(guard);
        std::process::exit(1);
    }
}
