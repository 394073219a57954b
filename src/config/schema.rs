//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from the TOML file.

use serde::{Deserialize, Serialize};

/// Port the proxy listens on when the config file does not name one.
pub const DEFAULT_PORT: u16 = 9200;

/// Root configuration for the CCS proxy.
#[derive(Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Listener port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Listener host. Loopback only unless configured otherwise.
    #[serde(default = "default_host")]
    pub host: String,

    /// Enable debug logging.
    #[serde(default)]
    pub debug: bool,

    /// The non-CCS ("local") cluster.
    pub server: ServerConfig,

    /// The cross-cluster-search cluster.
    pub ccs_server: ServerConfig,

    /// URL substrings whose routing log line is demoted to debug.
    #[serde(default = "default_quiet_paths")]
    pub quiet_paths: Vec<String>,

    /// Timeout configuration.
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Build a config for the two given backend URLs, everything else defaulted.
    pub fn new(server_url: impl Into<String>, ccs_url: impl Into<String>, ccs_api_key: impl Into<String>) -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            debug: false,
            server: ServerConfig {
                url: server_url.into(),
                api_key: None,
            },
            ccs_server: ServerConfig {
                url: ccs_url.into(),
                api_key: Some(ccs_api_key.into()),
            },
            quiet_paths: default_quiet_paths(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    /// The `host:port` the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Hand-written so the startup debug dump never prints credentials.
impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("debug", &self.debug)
            .field("server", &self.server)
            .field("ccs_server", &self.ccs_server)
            .field("quiet_paths", &self.quiet_paths)
            .field("timeouts", &self.timeouts)
            .field("observability", &self.observability)
            .finish()
    }
}

/// One Elasticsearch endpoint.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL, e.g. `https://my-deployment.es.example.com:9243`.
    pub url: String,

    /// API key sent as `Authorization: ApiKey <key>`.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<** api_key **>"))
            .finish()
    }
}

/// Timeout configuration for outbound connections.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { connect_secs: 10 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log line format.
    pub log_format: LogFormat,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_quiet_paths() -> Vec<String> {
    vec!["/.kibana_task_manager".to_string()]
}
