//! Command line arguments.

use clap::Parser;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, ProxyConfig};

/// Default configuration file, relative to the home directory.
pub const DEFAULT_CONFIG_PATH: &str = "~/.es-ccs-proxy.toml";

#[derive(Parser, Debug)]
#[command(
    name = "es-ccs-proxy",
    version,
    about = "Routes Elasticsearch cross-cluster search traffic to a dedicated CCS cluster"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Listen port, overrides the configuration file
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Apply command line overrides to a loaded config and validate the
    /// result again, so a flag cannot smuggle in a value the file could not.
    pub fn apply_overrides(&self, config: &mut ProxyConfig) -> Result<(), ConfigError> {
        if let Some(port) = self.port {
            config.port = port;
        }
        config.debug |= self.debug;

        validate_config(config).map_err(ConfigError::Validation)
    }
}
