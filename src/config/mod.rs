//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!
//! environment
//!     → secret.rs (ApiKey, read once at startup)
//!     → injected into the handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod secret;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ErrorStatusMode, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, ResponseConfig,
    SecurityConfig, TimeoutConfig, UpstreamConfig,
};
pub use secret::{ApiKey, API_KEY_ENV_VAR};
