//! Gemini prompt proxy.
//!
//! Accepts `POST { "prompt": … }`, forwards it to the Gemini
//! `generateContent` API with a server-held key, and answers with
//! `{ "text": … }` or `{ "error": … }`.
//!
//! ```text
//!   Client                     gemini-proxy                        Gemini API
//!     │  POST /gemini-proxy      │                                     │
//!     │ ───────────────────────▶ │ method? key? prompt?                │
//!     │                          │  POST …:generateContent?key=…       │
//!     │                          │ ──────────────────────────────────▶ │
//!     │                          │ ◀────────────────────────────────── │
//!     │  200 { text } / { error }│ candidates[0].content.parts[0].text │
//!     │ ◀─────────────────────── │                                     │
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use gemini_proxy::config::{load_config, validation::validate_config, ApiKey, ConfigError, ProxyConfig};
use gemini_proxy::observability::{logging, metrics};
use gemini_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "gemini-proxy")]
#[command(about = "Forward prompts to the Gemini API with a server-held key", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability)?;

    tracing::info!("gemini-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        route = %config.listener.route_path,
        model = %config.upstream.model,
        error_status = ?config.responses.error_status,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let api_key = ApiKey::from_env_var(&config.upstream.api_key_env);
    if api_key.is_some() {
        tracing::info!(env_var = %config.upstream.api_key_env, "API key found");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, api_key)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
