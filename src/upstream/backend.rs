//! Backend abstraction.
//!
//! # Responsibilities
//! - Name the two clusters the proxy can route to
//! - Hold each cluster's pre-parsed base URL and credential
//! - Build the outbound URI and `Authorization` value for a request

use axum::http::{HeaderValue, Uri};
use url::Url;

use crate::config::{ProxyConfig, ServerConfig};

/// Which cluster a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// The non-CCS cluster (`server`).
    Local,
    /// The cross-cluster-search cluster (`ccs_server`).
    Ccs,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Ccs => "ccs",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error building a destination from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid backend url \"{0}\": {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("api key contains characters not allowed in a header")]
    InvalidApiKey,
}

/// A single resolved backend cluster.
#[derive(Debug, Clone)]
pub struct Destination {
    /// Pre-parsed base URL.
    pub base_url: Url,
    /// Ready-made `ApiKey <key>` header value, if a key is configured.
    authorization: Option<HeaderValue>,
}

impl Destination {
    pub fn from_config(server: &ServerConfig) -> Result<Self, BackendError> {
        let base_url =
            Url::parse(&server.url).map_err(|e| BackendError::InvalidUrl(server.url.clone(), e))?;

        let authorization = match &server.api_key {
            Some(key) => {
                let mut value = HeaderValue::from_str(&format!("ApiKey {}", key))
                    .map_err(|_| BackendError::InvalidApiKey)?;
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };

        Ok(Self {
            base_url,
            authorization,
        })
    }

    /// The `Authorization` header value to inject, if any.
    pub fn authorization(&self) -> Option<&HeaderValue> {
        self.authorization.as_ref()
    }

    /// `host[:port]` of the backend, used as the outbound `Host` header.
    pub fn authority(&self) -> String {
        match (self.base_url.host_str(), self.base_url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            _ => String::new(),
        }
    }

    /// Join the backend base URL with an already-encoded request path and query.
    ///
    /// The path is appended verbatim so `%3A` escapes survive untouched.
    pub fn uri_for(&self, path: &str, query: Option<&str>) -> Result<Uri, axum::http::uri::InvalidUri> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let uri = match query {
            Some(q) => format!("{}{}?{}", base, path, q),
            None => format!("{}{}", base, path),
        };
        uri.parse()
    }
}

/// The two destinations, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Backends {
    local: Destination,
    ccs: Destination,
}

impl Backends {
    pub fn from_config(config: &ProxyConfig) -> Result<Self, BackendError> {
        Ok(Self {
            local: Destination::from_config(&config.server)?,
            ccs: Destination::from_config(&config.ccs_server)?,
        })
    }

    pub fn get(&self, kind: BackendKind) -> &Destination {
        match kind {
            BackendKind::Local => &self.local,
            BackendKind::Ccs => &self.ccs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backends() -> Backends {
        let mut config = ProxyConfig::new("http://local:9200", "https://ccs.example.com:9243/", "ccs-key");
        config.server.api_key = None;
        Backends::from_config(&config).unwrap()
    }

    #[test]
    fn test_selects_destination_by_kind() {
        let backends = backends();
        assert_eq!(backends.get(BackendKind::Local).authority(), "local:9200");
        assert_eq!(backends.get(BackendKind::Ccs).authority(), "ccs.example.com:9243");
    }

    #[test]
    fn test_authorization_only_when_key_configured() {
        let backends = backends();
        assert!(backends.get(BackendKind::Local).authorization().is_none());
        assert_eq!(
            backends.get(BackendKind::Ccs).authorization().unwrap(),
            "ApiKey ccs-key"
        );
    }

    #[test]
    fn test_uri_keeps_encoded_path() {
        let backends = backends();
        let uri = backends
            .get(BackendKind::Ccs)
            .uri_for("/cluster1%3Alogs*%3A/_async_search", Some("size=0"))
            .unwrap();
        assert_eq!(
            uri.to_string(),
            "https://ccs.example.com:9243/cluster1%3Alogs*%3A/_async_search?size=0"
        );
    }
}
