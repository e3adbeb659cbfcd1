//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, the endpoint URL and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let path = &config.listener.route_path;
    if !path.starts_with('/') {
        errors.push(ValidationError::new("listener.route_path", "must start with '/'"));
    } else if path.contains('{') || path.contains('}') {
        errors.push(ValidationError::new("listener.route_path", "must not contain path parameters"));
    } else if path == "/health" {
        errors.push(ValidationError::new("listener.route_path", "'/health' is reserved"));
    }

    match url::Url::parse(&config.upstream.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("upstream.base_url", e.to_string())),
    }

    for (field, value) in [
        ("upstream.api_version", &config.upstream.api_version),
        ("upstream.model", &config.upstream.model),
    ] {
        if value.is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        } else if value.contains('/') {
            errors.push(ValidationError::new(field, "must be a single path segment"));
        }
    }

    if config.upstream.api_key_env.trim().is_empty() {
        errors.push(ValidationError::new("upstream.api_key_env", "must not be empty"));
    }

    if config.upstream.timeout_secs == Some(0) {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.upstream.model = "models/gemini".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["listener.bind_address", "upstream.model", "timeouts.request_secs"]
        );
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = "ftp://example.com".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_route_path_rules() {
        let mut config = ProxyConfig::default();
        config.listener.route_path = "gemini".into();
        assert!(validate_config(&config).is_err());

        config.listener.route_path = "/health".into();
        assert!(validate_config(&config).is_err());

        config.listener.route_path = "/api/{model}".into();
        assert!(validate_config(&config).is_err());

        config.listener.route_path = "/.netlify/functions/gemini-proxy".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn test_zero_upstream_timeout_rejected() {
        let mut config = ProxyConfig::default();
        config.upstream.timeout_secs = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "upstream.timeout_secs");
    }
}
