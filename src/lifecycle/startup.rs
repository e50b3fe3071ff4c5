//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Build the route table and HTTP server from a validated config
//! - Bind the listener and serve until a signal arrives

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Run the shell until SIGINT/SIGTERM.
pub async fn run(config: ShellConfig) -> Result<(), ShellError> {
    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());
    run_with_shutdown(config, &shutdown).await
}

/// Run the shell until `shutdown` is triggered.
pub async fn run_with_shutdown(config: ShellConfig, shutdown: &Shutdown) -> Result<(), ShellError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config)?;
    let address = server.config().listener.bind_address.clone();

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ShellError::Bind {
            address: address.clone(),
            source,
        })?;

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(ShellError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
