//! The proxy function.
//!
//! `ProxyHandler` turns one inbound request into one response:
//!
//! ```text
//! method != POST        → 405 "Method Not Allowed"
//! no API key            → MissingApiKey
//! body → Prompt         → EmptyBody / InvalidBody
//! Prompt → Gemini       → Transport / Upstream / UpstreamDecode / NoContent
//! deadline elapsed      → DeadlineExceeded
//! text                  → 200 { "text": … }
//! ```
//!
//! The handler holds no mutable state; one instance serves all invocations.

use axum::http::Method;
use std::time::{Duration, Instant};

use crate::config::{ApiKey, ResponseConfig};
use crate::error::ProxyError;
use crate::http::request::{InboundRequest, Prompt};
use crate::http::response::ProxyResponse;
use crate::observability::metrics;
use crate::upstream::UpstreamClient;

pub struct ProxyHandler {
    upstream: UpstreamClient,
    api_key: Option<ApiKey>,
    responses: ResponseConfig,
    deadline: Option<Duration>,
}

impl ProxyHandler {
    /// Create a handler. A `None` key makes every POST fail with a configuration error.
    pub fn new(upstream: UpstreamClient, api_key: Option<ApiKey>, responses: ResponseConfig) -> Self {
        Self {
            upstream,
            api_key,
            responses,
            deadline: None,
        }
    }

    /// Bound each invocation. When it elapses the caller still gets a JSON error.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Handle one invocation. Never fails; errors are rendered into the response.
    #[tracing::instrument(
        name = "invocation",
        skip_all,
        fields(request_id = %request.request_id, method = %request.method)
    )]
    pub async fn handle(&self, request: InboundRequest) -> ProxyResponse {
        let start = Instant::now();
        tracing::info!("Invocation started");

        let result = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.invoke(&request))
                .await
                .unwrap_or_else(|_| Err(ProxyError::DeadlineExceeded(deadline.as_secs()))),
            None => self.invoke(&request).await,
        };

        let response = match result {
            Ok(text) => {
                tracing::info!(text_len = text.len(), "Invocation succeeded");
                ProxyResponse::success(&text)
            }
            Err(err) => {
                if let ProxyError::MethodNotAllowed(_) = err {
                    tracing::warn!("Blocked non-POST request");
                } else {
                    tracing::error!(error = %err, class = err.class().as_str(), "Proxy invocation failed");
                }
                ProxyResponse::from_error(&err, &self.responses)
            }
        };

        metrics::record_request(request.method.as_str(), response.status.as_u16(), start);
        response
    }

    async fn invoke(&self, request: &InboundRequest) -> Result<String, ProxyError> {
        if request.method != Method::POST {
            return Err(ProxyError::MethodNotAllowed(request.method.clone()));
        }

        let api_key = self.api_key.as_ref().ok_or(ProxyError::MissingApiKey)?;

        let prompt = Prompt::from_body(&request.body)?;
        tracing::debug!(prompt_len = prompt.len(), "Parsed prompt from request body");

        self.upstream.generate_content(api_key, prompt.as_str()).await
    }
}
