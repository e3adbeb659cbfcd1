//! Error types for proxy invocations and startup.

use axum::http::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::{ConfigError, ErrorStatusMode};

/// Broad origin of a failure, used for status mapping and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Method,
    Configuration,
    Request,
    Upstream,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Method => "method",
            ErrorClass::Configuration => "configuration",
            ErrorClass::Request => "request",
            ErrorClass::Upstream => "upstream",
        }
    }
}

/// Errors that can occur while handling a single invocation.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Anything other than POST.
    #[error("Method Not Allowed")]
    MethodNotAllowed(Method),

    /// No API key was injected at startup.
    #[error("API key is not configured on the server.")]
    MissingApiKey,

    #[error("Request body is empty.")]
    EmptyBody,

    /// Body is not JSON or has no string `prompt` field.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    /// The outbound call never produced a response. The URL is stripped.
    #[error("Failed to reach Gemini API: {0}")]
    Transport(#[source] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("Gemini API error: {}", status_line(.status))]
    Upstream { status: StatusCode, body: String },

    /// The invocation outlived the server's request deadline.
    #[error("Gemini API did not respond within {0} seconds.")]
    DeadlineExceeded(u64),

    #[error("Invalid JSON in Gemini API response: {0}")]
    UpstreamDecode(#[source] serde_json::Error),

    /// Upstream answered 2xx but without `candidates[0].content.parts[0].text`.
    #[error("No valid content in Gemini API response.")]
    NoContent {
        block_reason: Option<String>,
        raw: Value,
    },
}

fn status_line(status: &StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

impl ProxyError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ProxyError::MethodNotAllowed(_) => ErrorClass::Method,
            ProxyError::MissingApiKey => ErrorClass::Configuration,
            ProxyError::EmptyBody | ProxyError::InvalidBody(_) => ErrorClass::Request,
            ProxyError::Transport(_)
            | ProxyError::Upstream { .. }
            | ProxyError::DeadlineExceeded(_)
            | ProxyError::UpstreamDecode(_)
            | ProxyError::NoContent { .. } => ErrorClass::Upstream,
        }
    }

    /// Status code returned to the caller under the given policy.
    pub fn status_code(&self, mode: ErrorStatusMode) -> StatusCode {
        if let ProxyError::MethodNotAllowed(_) = self {
            return StatusCode::METHOD_NOT_ALLOWED;
        }

        match mode {
            ErrorStatusMode::Compatible => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorStatusMode::Passthrough => match self {
                ProxyError::Upstream { status, .. } => *status,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ErrorStatusMode::Precise => match self {
                ProxyError::Transport(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
                ProxyError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
                _ => match self.class() {
                    ErrorClass::Request => StatusCode::BAD_REQUEST,
                    ErrorClass::Upstream => StatusCode::BAD_GATEWAY,
                    ErrorClass::Method | ErrorClass::Configuration => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                },
            },
        }
    }

    /// Raw upstream result attached to shape errors.
    pub fn details(&self) -> Option<&Value> {
        match self {
            ProxyError::NoContent { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid upstream endpoint '{endpoint}': {source}")]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
