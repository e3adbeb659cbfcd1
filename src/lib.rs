//! Gemini prompt proxy library.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use error::{ProxyError, StartupError};
pub use http::{HttpServer, ProxyHandler};
pub use lifecycle::Shutdown;
