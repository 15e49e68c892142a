//! Travel journal request-forwarding gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                   GATEWAY                     │
//!     GET/POST            │  ┌────────┐   ┌─────────┐   ┌──────────────┐  │
//!     {prefix}/{path} ────┼─▶│  http  │──▶│ gateway │──▶│   routing    │  │
//!                         │  │ server │   │  entry  │   │ (fallback    │  │
//!                         │  └────────┘   └─────────┘   │   chain)     │  │
//!                         │                             └──────┬───────┘  │
//!                         │                      per candidate │          │
//!                         │                                    ▼          │
//!                         │  ┌────────────┐   ┌───────────────────────┐   │
//!                         │  │ resilience │──▶│ upstream: url → call  │───┼──▶ candidate 0
//!                         │  │ retry/dead │   │ → single body read    │───┼──▶ candidate 1
//!                         │  └────────────┘   └───────────────────────┘   │
//!                         │                                               │
//!                         │  config · observability · lifecycle           │
//!                         └───────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use journal_gateway::config::resolve_config;
use journal_gateway::lifecycle::{wait_for_signal, Shutdown};
use journal_gateway::observability::{logging, metrics};
use journal_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "journal-gateway")]
#[command(about = "Forwards journal operations to the first healthy backend bridge", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = resolve_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("journal-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        prefix = %config.listener.route_prefix,
        upstream_timeout_secs = ?config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
