//! Metrics collection and exposition.
//!
//! # Metrics
//! - `connectivity_probes_total` (counter): probes by `outcome` (success, failure)
//! - `connectivity_check_duration_seconds` (histogram): aggregate check latency
//! - `connectivity_status` (gauge): 1=connected, 0=disconnected
//! - `connectivity_listeners` (gauge): attached status listeners

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

use crate::reachability::ConnectionStatus;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_probe(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!("connectivity_probes_total", "outcome" => outcome).increment(1);
}

pub fn record_check_duration(started: Instant) {
    ::metrics::histogram!("connectivity_check_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

pub fn record_status(status: ConnectionStatus) {
    let value = if status.is_connected() { 1.0 } else { 0.0 };
    ::metrics::gauge!("connectivity_status").set(value);
}

pub fn record_listeners(listeners: usize) {
    ::metrics::gauge!("connectivity_listeners").set(listeners as f64);
}
