//! es-ccs-proxy
//!
//! A reverse proxy that splits Elasticsearch traffic between a local
//! cluster and a cross-cluster search (CCS) cluster.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────┐
//!                      │                 CCS PROXY                  │
//!     Client Request   │  ┌─────────┐    ┌──────────┐               │
//!     ─────────────────┼─▶│  http   │───▶│ routing  │──┐            │
//!                      │  │ server  │    │ classify │  │ rewrite    │
//!                      │  └─────────┘    └────┬─────┘  ▼            │
//!                      │                      │   ┌──────────┐      │      Local
//!                      │       lookup         │   │ upstream │──────┼────▶ cluster
//!                      │  ┌─────────────┐◀────┘   │ backends │──────┼────▶ CCS
//!                      │  │ correlation │         └────┬─────┘      │      cluster
//!                      │  │  registry   │◀── id ── tap ┘            │
//!                      │  └─────────────┘                           │
//!                      └────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use es_ccs_proxy::cli::Cli;
use es_ccs_proxy::config::{expand_initial_tilde, load_config};
use es_ccs_proxy::lifecycle::startup;
use es_ccs_proxy::observability::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let path = expand_initial_tilde(&cli.config);
    let mut config = match load_config(Path::new(&path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error loading configuration from {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cli.apply_overrides(&mut config) {
        eprintln!("invalid command line override: {}", e);
        return ExitCode::FAILURE;
    }

    init_logging(config.debug, config.observability.log_format);
    tracing::info!("es-ccs-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    match startup::start(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Proxy stopped with an error");
            ExitCode::FAILURE
        }
    }
}
