//! Search relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────┐
//!                       │               SEARCH RELAY               │
//!   Browser             │                                          │
//!   ───────────────────▶│  POST /api/search ──▶ relay ─────────────┼──▶ Search service
//!                       │                      (+ api-key header)  │    (upstream)
//!   ◀───────────────────│◀──────── status + JSON body, unchanged ◀─┼───
//!                       │                                          │
//!                       │  GET /api/config  ──▶ client settings    │
//!                       │  GET /, /*        ──▶ static assets      │
//!                       └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use search_relay::config::loader::{load_config, load_dotenv};
use search_relay::lifecycle::{wait_for_signal, Shutdown};
use search_relay::observability::init_logging;
use search_relay::HttpServer;

#[derive(Parser)]
#[command(name = "search-relay")]
#[command(about = "Relays browser search requests to a managed search service", long_about = None)]
struct Args {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment file to load instead of searching for `.env`.
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Port override (takes precedence over PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let env_file = load_dotenv(args.env_file.as_deref())?;
    let mut config = load_config(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.listener.port = port;
    }

    init_logging(&config.observability)?;

    tracing::info!("search-relay v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = env_file {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = ?config.upstream,
        max_body_size = config.limits.max_body_size,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        address = %local_addr,
        "Server running on http://{} - open it in a browser to search",
        local_addr
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config)?;

    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
