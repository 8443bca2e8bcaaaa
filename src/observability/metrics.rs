//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relay requests by content kind and status
//! - `relay_request_duration_seconds` (histogram): end-to-end relay latency
//! - `relay_upstream_failures_total` (counter): fetches that produced no response
//! - `relay_rewritten_bytes_total` (counter): bytes emitted after rewriting, by kind
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so handlers and
//!   tests never need to check whether metrics are enabled
//! - Exposition runs on its own listener, apart from the relay port

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a finished relay request.
pub fn record_request(kind: &'static str, status: u16, start_time: Instant) {
    let status = status.to_string();
    ::metrics::counter!("relay_requests_total", "kind" => kind, "status" => status).increment(1);
    ::metrics::histogram!("relay_request_duration_seconds", "kind" => kind)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record an upstream fetch that failed before a response arrived.
pub fn record_upstream_failure() {
    ::metrics::counter!("relay_upstream_failures_total").increment(1);
}

/// Record the size of a rewritten body.
pub fn record_rewrite(kind: &'static str, bytes: usize) {
    ::metrics::counter!("relay_rewritten_bytes_total", "kind" => kind).increment(bytes as u64);
}
