//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the relay pipeline produce:
//!     → logging.rs (structured log events, request ID in every span)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (pretty for development, JSON for aggregation)
//!     → Prometheus scrape endpoint (when enabled)
//! ```

pub mod logging;
pub mod metrics;
