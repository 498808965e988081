//! Device registry server.
//!
//! Loads configuration, initializes logging and metrics, then serves the
//! device API until SIGINT/SIGTERM.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use device_registry::config::{load_config, ServiceConfig};
use device_registry::http::HttpServer;
use device_registry::lifecycle::{wait_for_shutdown, Shutdown};
use device_registry::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "device-registry")]
#[command(about = "HTTP registry of network devices", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_path = ?args.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.http_server.timeout_secs,
        auth_enabled = config.auth.enabled,
        "device-registry starting"
    );

    if config.observability.metrics_enabled {
        // Address already checked by config validation.
        match config.observability.metrics_address.parse() {
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
    let server_shutdown = shutdown.subscribe();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        wait_for_shutdown().await;
        trigger.trigger();
    });

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
