//! Payflow server — entry point.
//!
//! Starts the payment service with configuration from a TOML file or
//! defaults.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use payflow_server::api;
use payflow_server::config::ServerConfig;
use payflow_server::state::AppState;

/// Payflow payment service
#[derive(Parser, Debug)]
#[command(name = "payflow-server", version, about = "Payflow payment service")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "payflow.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the public base URL used in return links.
    #[arg(long)]
    public_base_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    // Handle --init flag
    if args.init {
        let config = ServerConfig::default();
        config.save(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote default config");
        return Ok(());
    }

    // Load configuration
    let mut config = ServerConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(public_base_url) = args.public_base_url {
        config.payment.public_base_url = public_base_url;
    }
    config.logging.level = args.log_level;

    tracing::info!("Payflow server v{}", env!("CARGO_PKG_VERSION"));

    let listen_addr: SocketAddr =
        format!("{}:{}", config.api.listen_addr, config.api.port).parse()?;
    let state = AppState::new(config);

    // Set up graceful shutdown on SIGINT/SIGTERM
    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
        tracing::info!("received shutdown signal");
    };

    tokio::select! {
        result = api::start_api_server(listen_addr, state) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP API server error");
            }
        }
        _ = shutdown => {
            tracing::info!("initiating graceful shutdown");
        }
    }

    tracing::info!("Payflow server exited cleanly");
    Ok(())
}
