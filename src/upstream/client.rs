//! Gemini API client.
//!
//! # Responsibilities
//! - Build the `generateContent` endpoint once at startup
//! - Send exactly one POST per invocation, key as the `key` query parameter
//! - Classify failures: transport, non-2xx, undecodable JSON, missing content
//!
//! # Security Constraints
//! - The key is part of the request URL, so URLs are stripped from reqwest
//!   errors before they are logged or rendered
//! - The endpoint is logged without the query string

use serde_json::Value;
use std::time::{Duration, Instant};
use url::Url;

use crate::config::{ApiKey, UpstreamConfig};
use crate::error::{ProxyError, StartupError};
use crate::observability::metrics;
use crate::upstream::types::GenerateContentRequest;

/// Outbound client for the generative-language API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: Url,
    model: String,
}

impl UpstreamClient {
    /// Create a client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, StartupError> {
        let endpoint_str = config.endpoint();
        let endpoint = Url::parse(&endpoint_str).map_err(|source| StartupError::Endpoint {
            endpoint: endpoint_str.clone(),
            source,
        })?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("gemini-proxy/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build().map_err(StartupError::HttpClient)?;

        tracing::info!(
            endpoint = %endpoint,
            timeout_secs = ?config.timeout_secs,
            "Upstream client initialized"
        );

        Ok(Self {
            http,
            endpoint,
            model: config.model.clone(),
        })
    }

    /// The endpoint, without the key.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send `prompt` as a single user turn and return the first text part.
    pub async fn generate_content(&self, api_key: &ApiKey, prompt: &str) -> Result<String, ProxyError> {
        let payload = GenerateContentRequest::from_prompt(prompt);
        let start = Instant::now();

        tracing::debug!(model = %self.model, "Calling Gemini API");
        let response = match self
            .http
            .post(self.endpoint.clone())
            .query(&[("key", api_key.expose())])
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream("transport_error", start);
                return Err(ProxyError::Transport(e.without_url()));
            }
        };

        let status = response.status();
        metrics::record_upstream(status.as_str(), start);
        tracing::info!(status = status.as_u16(), "Gemini API responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Gemini API error body");
            return Err(ProxyError::Upstream { status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProxyError::Transport(e.without_url()))?;
        let raw: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, body = %body, "Gemini API returned invalid JSON");
            ProxyError::UpstreamDecode(e)
        })?;
        tracing::debug!("Successfully received response from Gemini");

        extract_text(raw)
    }
}

const TEXT_PATH: &str = "/candidates/0/content/parts/0/text";
const BLOCK_REASON_PATH: &str = "/promptFeedback/blockReason";

/// Pull `candidates[0].content.parts[0].text` out of a decoded response.
///
/// Only that path is inspected; other fields may have any shape.
fn extract_text(raw: Value) -> Result<String, ProxyError> {
    if let Some(text) = raw.pointer(TEXT_PATH).and_then(Value::as_str) {
        return Ok(text.to_string());
    }

    let block_reason = raw
        .pointer(BLOCK_REASON_PATH)
        .and_then(Value::as_str)
        .map(str::to_string);
    tracing::error!(
        block_reason = ?block_reason,
        result = %raw,
        "Invalid response structure from Gemini"
    );
    Err(ProxyError::NoContent { block_reason, raw })
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish()
    }
}
