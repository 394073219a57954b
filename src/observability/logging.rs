//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Pick the log level from `RUST_LOG`, the debug flag, or the default
//! - Decide the level of per-request routing lines (quiet paths)
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

const DEFAULT_FILTER: &str = "es_ccs_proxy=info,tower_http=info";
const DEBUG_FILTER: &str = "es_ccs_proxy=debug,tower_http=debug";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `debug` selects the verbose filter.
pub fn init_logging(debug: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { DEBUG_FILTER } else { DEFAULT_FILTER })
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("logging already initialized: {}", e);
    }
}

/// True when routing lines for `url` should be logged at debug only.
pub fn is_quiet(url: &str, quiet_paths: &[String]) -> bool {
    quiet_paths.iter().any(|p| !p.is_empty() && url.contains(p.as_str()))
}
