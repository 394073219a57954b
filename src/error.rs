//! Errors raised while forwarding a single request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{}", error_chain(.0))]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("invalid upstream uri: {0}")]
    InvalidUri(#[from] axum::http::uri::InvalidUri),

    #[error("invalid outbound request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),
}

impl ProxyError {
    /// Whether the backend itself could not be reached or failed mid-request.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ProxyError::Upstream(_))
    }
}

/// Render an error followed by its sources, `outer: inner: root`.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Errors that stop the proxy from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("backend error: {0}")]
    Backend(#[from] crate::upstream::BackendError),

    #[error("invalid listen address \"{0}\"")]
    Address(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
