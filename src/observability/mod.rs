//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler / upstream client produce:
//!     → logging.rs (structured log events, request ID span)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```

pub mod logging;
pub mod metrics;
