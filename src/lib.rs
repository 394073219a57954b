//! Elasticsearch cross-cluster search proxy library.
//!
//! Sits between a client (typically Kibana) and two Elasticsearch
//! clusters. Requests that address remote indices are rewritten and sent
//! to the CCS cluster; everything else goes to the local cluster.

pub mod cli;
pub mod config;
pub mod correlation;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
