//! Upstream (Gemini API) subsystem.
//!
//! # Data Flow
//! ```text
//! Prompt + ApiKey
//!     → types.rs (GenerateContentRequest, single user turn)
//!     → client.rs (POST {base}/{version}/models/{model}:generateContent?key=…)
//!     → client.rs (JSON path candidates[0].content.parts[0].text)
//! ```
//!
//! # Design Decisions
//! - One outbound call per invocation, no retries
//! - No timeout unless configured

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::GenerateContentRequest;
