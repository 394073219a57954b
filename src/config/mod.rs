//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! ~/.es-ccs-proxy.toml
//!     → loader.rs (tilde expansion, mode 600 check, parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - Backend URLs and the CCS api key are required, everything else defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{expand_initial_tilde, load_config, ConfigError};
pub use schema::{LogFormat, ObservabilityConfig, ProxyConfig, ServerConfig, TimeoutConfig};
pub use validation::ValidationError;
