//! carousel, a round-robin HTTP load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────┐
//!                      │                 CAROUSEL                  │
//!   Client Request     │  ┌──────────┐   ┌──────────────────────┐ │
//!   ───────────────────┼─▶│ listener │──▶│   dispatch handler   │ │
//!                      │  └──────────┘   └──────────┬───────────┘ │
//!                      │                            │ next()      │
//!                      │                  ┌─────────▼──────────┐  │
//!                      │                  │    BackendPool     │  │
//!                      │                  │  (atomic rotation) │  │
//!                      │                  └─────────┬──────────┘  │
//!   Client Response    │                  ┌─────────▼──────────┐  │      Backend
//!   ◀──────────────────┼──────────────────│ forwarding binding │◀─┼───── Server
//!                      │                  └────────────────────┘  │
//!                      └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use carousel::config::{self, CliOverrides};
use carousel::http::HttpServer;
use carousel::lifecycle::{signals, Shutdown};
use carousel::load_balancer::BackendPool;
use carousel::net::tls;
use carousel::observability;

#[derive(Parser)]
#[command(name = "carousel")]
#[command(about = "Round-robin HTTP load balancer", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "carousel.toml")]
    config: PathBuf,

    /// Comma-separated backend list, overrides the config file
    #[arg(long)]
    backends: Option<String>,

    /// Listen address, overrides the config file
    #[arg(long)]
    bind: Option<String>,

    /// Balancing mode, overrides the config file (only "round-robin")
    #[arg(long)]
    mode: Option<String>,

    /// TLS certificate file, overrides the config file
    #[arg(long)]
    cert_file: Option<String>,

    /// TLS private key file, overrides the config file
    #[arg(long)]
    key_file: Option<String>,
}

#[tokio::main]
async fn main() {
    observability::logging::init();

    let cli = Cli::parse();
    let overrides = CliOverrides {
        backends: cli.backends,
        bind: cli.bind,
        mode: cli.mode,
        cert_file: cli.cert_file,
        key_file: cli.key_file,
    };

    // Fatal configuration problems terminate before the listener opens.
    let config = match config::load_config(&cli.config, &overrides) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = ?cli.config, error = %e, "Configuration error");
            process::exit(1);
        }
    };

    for backend in &config.backends {
        tracing::info!(backend = %backend, "Using backend");
    }
    tracing::info!(bind = %config.bind, mode = %config.mode, "Configuration loaded");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let pool = match BackendPool::new(&config.backends) {
        Ok(pool) => Arc::new(pool),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build backend pool");
            process::exit(1);
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(&config, pool);

    let result = match (&config.cert_file, &config.key_file) {
        (Some(cert_file), Some(key_file)) => {
            let rustls = match tls::load_tls_config(
                &PathBuf::from(cert_file),
                &PathBuf::from(key_file),
            )
            .await
            {
                Ok(rustls) => rustls,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load TLS material");
                    process::exit(1);
                }
            };
            let addr = match config.bind.parse() {
                Ok(addr) => addr,
                Err(e) => {
                    tracing::error!(bind = %config.bind, error = %e, "Invalid bind address");
                    process::exit(1);
                }
            };
            server.run_tls(addr, rustls, server_shutdown).await
        }
        _ => {
            let listener = match TcpListener::bind(&config.bind).await {
                Ok(listener) => listener,
                Err(e) => {
                    tracing::error!(bind = %config.bind, error = %e, "Failed to bind listener");
                    process::exit(1);
                }
            };
            server.run(listener, server_shutdown).await
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Server error");
        process::exit(1);
    }

    tracing::info!("Shutdown complete");
}
