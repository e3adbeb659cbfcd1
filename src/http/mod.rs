//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, InboundRequest)
//!     → handler.rs (method check, key, prompt, upstream call)
//!     → response.rs (status + JSON or plain text)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::ProxyHandler;
pub use request::{InboundRequest, Prompt, RequestIdExt, X_REQUEST_ID};
pub use response::{ProxyResponse, ResponseBody};
pub use server::HttpServer;
