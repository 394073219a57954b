//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check backend URLs are absolute http(s) URLs
//! - Check credentials are present where required
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::{ProxyConfig, ServerConfig};

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("config key \"port\" must not be 0")]
    InvalidPort,

    #[error("config key \"{key}.url\" is not a valid URL: {reason}")]
    InvalidUrl { key: &'static str, reason: String },

    #[error("config key \"{key}.url\" must use http or https, got \"{scheme}\"")]
    UnsupportedScheme { key: &'static str, scheme: String },

    #[error("config key \"{0}.api_key\" must be a non-empty string")]
    EmptyApiKey(&'static str),

    #[error("config key \"ccs_server.api_key\" is required")]
    MissingCcsApiKey,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    validate_server("server", &config.server, &mut errors);
    validate_server("ccs_server", &config.ccs_server, &mut errors);

    if config.ccs_server.api_key.is_none() {
        errors.push(ValidationError::MissingCcsApiKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_server(key: &'static str, server: &ServerConfig, errors: &mut Vec<ValidationError>) {
    match Url::parse(&server.url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme {
                    key,
                    scheme: url.scheme().to_string(),
                });
            } else if url.host_str().is_none() {
                errors.push(ValidationError::InvalidUrl {
                    key,
                    reason: "missing host".to_string(),
                });
            }
        }
        Err(e) => errors.push(ValidationError::InvalidUrl {
            key,
            reason: e.to_string(),
        }),
    }

    if let Some(api_key) = &server.api_key {
        if api_key.trim().is_empty() {
            errors.push(ValidationError::EmptyApiKey(key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProxyConfig {
        ProxyConfig::new("http://localhost:9200", "https://ccs.example.com:9243", "k")
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid();
        config.port = 0;
        config.server.url = "not a url".into();
        config.ccs_server.api_key = None;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::InvalidPort));
        assert!(errors.contains(&ValidationError::MissingCcsApiKey));
        assert!(matches!(errors[1], ValidationError::InvalidUrl { key: "server", .. }));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = valid();
        config.ccs_server.url = "ftp://ccs.example.com".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnsupportedScheme {
                key: "ccs_server",
                scheme: "ftp".into()
            }]
        );
    }

    #[test]
    fn test_rejects_blank_api_keys() {
        let mut config = valid();
        config.server.api_key = Some("".into());
        config.ccs_server.api_key = Some("  ".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyApiKey("server"),
                ValidationError::EmptyApiKey("ccs_server"),
            ]
        );
    }
}
