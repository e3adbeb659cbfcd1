//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::config::secret::API_KEY_ENV_VAR;

/// Root configuration for the Gemini proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, route).
    pub listener: ListenerConfig,

    /// Gemini API endpoint and credential source.
    pub upstream: UpstreamConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// How failures are rendered to callers.
    pub responses: ResponseConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path the proxy function is mounted on.
    pub route_path: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            route_path: "/gemini-proxy".to_string(),
        }
    }
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Scheme and host of the generative-language API.
    pub base_url: String,

    /// API version path segment (e.g., "v1beta").
    pub api_version: String,

    /// Model identifier path segment.
    pub model: String,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// Total timeout for the outbound call. `None` keeps the client default.
    pub timeout_secs: Option<u64>,

    /// Honor HTTP(S)_PROXY environment variables for the outbound call.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_version: "v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: API_KEY_ENV_VAR.to_string(),
            timeout_secs: None,
            use_system_proxy: true,
        }
    }
}

impl UpstreamConfig {
    /// The `generateContent` endpoint, without the key query parameter.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            self.model
        )
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 120 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Status code policy for failed invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatusMode {
    /// Every failure except 405 is a 500.
    #[default]
    Compatible,
    /// Upstream non-2xx statuses are passed through; everything else is 500.
    Passthrough,
    /// 400 for bad input, 500 for configuration, 502/504 for upstream failures.
    Precise,
}

/// Error rendering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseConfig {
    pub error_status: ErrorStatusMode,

    /// Attach the raw upstream result to "no valid content" errors.
    pub expose_upstream_details: bool,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            error_status: ErrorStatusMode::Compatible,
            expose_upstream_details: true,
        }
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Full,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let config = UpstreamConfig::default();
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = UpstreamConfig {
            base_url: "http://127.0.0.1:9000/".to_string(),
            model: "gemini-1.5-pro".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint(),
            "http://127.0.0.1:9000/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            model = "gemini-1.5-flash"

            [responses]
            error_status = "precise"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.model, "gemini-1.5-flash");
        assert_eq!(config.upstream.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.responses.error_status, ErrorStatusMode::Precise);
        assert!(config.responses.expose_upstream_details);
        assert_eq!(config.listener.route_path, "/gemini-proxy");
        assert!(config.upstream.timeout_secs.is_none());
    }

    #[test]
    fn test_unknown_error_mode_rejected() {
        let result: Result<ProxyConfig, _> = toml::from_str(
            r#"
            [responses]
            error_status = "loud"
            "#,
        );
        assert!(result.is_err());
    }
}
