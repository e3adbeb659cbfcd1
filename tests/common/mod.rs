//! Shared utilities for integration tests.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use gemini_proxy::config::UpstreamConfig;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// A request the mock upstream received.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: Arc<String>,
    delay: Duration,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// A mock Gemini API answering every request with a fixed status and body.
pub struct MockUpstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    /// Upstream config pointing at this mock, ignoring system proxies.
    pub fn config(&self) -> UpstreamConfig {
        UpstreamConfig {
            base_url: format!("http://{}", self.addr),
            use_system_proxy: false,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }
}

/// Start a mock upstream on an ephemeral port.
pub async fn start_mock_upstream(status: u16, body: impl Into<String>) -> MockUpstream {
    start_slow_mock_upstream(Duration::ZERO, status, body).await
}

/// Start a mock upstream that waits `delay` before answering.
pub async fn start_slow_mock_upstream(
    delay: Duration,
    status: u16,
    body: impl Into<String>,
) -> MockUpstream {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status: StatusCode::from_u16(status).unwrap(),
        body: Arc::new(body.into()),
        delay,
        captured: captured.clone(),
    };

    let app = Router::new().fallback(record).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, captured }
}

/// Gemini success body whose first candidate says `text`.
#[allow(dead_code)]
pub fn gemini_reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] }, "finishReason": "STOP" }
        ]
    })
    .to_string()
}

async fn record(
    State(state): State<MockState>,
    uri: Uri,
    headers: axum::http::HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let request = CapturedRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    };
    state.captured.lock().unwrap().push(request);

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.as_ref().clone(),
    )
}
