//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy route and `/health`
//! - Wire up middleware (request ID, tracing, body limit, timeout)
//! - Bind server to listener
//! - Stop on the lifecycle shutdown broadcast

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{ApiKey, ProxyConfig};
use crate::error::StartupError;
use crate::http::handler::ProxyHandler;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, InboundRequest, RequestIdExt};
use crate::http::response::ProxyResponse;
use crate::upstream::UpstreamClient;

/// Extra time the outer timeout layer allows past the handler deadline.
const TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ProxyHandler>,
}

/// HTTP server hosting the proxy function.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and injected key.
    pub fn new(config: ProxyConfig, api_key: Option<ApiKey>) -> Result<Self, StartupError> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        let handler = ProxyHandler::new(upstream, api_key, config.responses.clone())
            .with_deadline(Duration::from_secs(config.timeouts.request_secs));

        if !handler.has_api_key() {
            tracing::warn!(
                env_var = %config.upstream.api_key_env,
                "API key not configured; every invocation will fail"
            );
        }

        let state = AppState {
            handler: Arc::new(handler),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.listener.route_path, any(invoke))
            .route("/health", get(health))
            .with_state(state)
            // Backstop only; the handler's own deadline answers with `{ "error" }` first.
            .layer(TimeoutLayer::new(
                Duration::from_secs(config.timeouts.request_secs).saturating_add(TIMEOUT_GRACE),
            ))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server until a shutdown message arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            route = %self.config.listener.route_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Proxy route. Accepts every method so non-POST gets the proxy's own 405.
async fn invoke(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> ProxyResponse {
    let request = InboundRequest::new(method, body).with_request_id(headers.request_id());
    state.handler.handle(request).await
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
