//! Startup orchestration.
//!
//! # Responsibilities
//! - Report the configured backends
//! - Start the metrics exporter when enabled
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener starts last (traffic only when ready)

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::error::StartupError;
use crate::http::HttpServer;
use crate::lifecycle::{signals::spawn_signal_handler, Shutdown};
use crate::observability::metrics;

/// Start the proxy and serve until a stop signal arrives.
pub async fn start(config: ProxyConfig) -> Result<(), StartupError> {
    tracing::info!("non-CCS server: {}", config.server.url);
    tracing::info!("CCS server:     {}", config.ccs_server.url);
    tracing::debug!(config = ?config, "Configuration loaded");

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr);
    }

    let bind_address = config.bind_address();
    let server = HttpServer::new(config)?;
    let listener = TcpListener::bind(&bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        "server started on port {}, access at http://{}/",
        local_addr.port(),
        local_addr
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    spawn_signal_handler(shutdown);

    server.run(listener, server_shutdown).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
