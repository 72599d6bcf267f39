//! Metrics collection and exposition.
//!
//! # Metrics
//! - `uptime_polls_total` (counter): polls by outcome
//! - `uptime_poll_duration_seconds` (histogram): poll latency
//! - `uptime_transitions_total` (counter): state changes by direction
//! - `uptime_notifications_total` (counter): webhook deliveries by result
//! - `uptime_target_healthy` (gauge): 1=healthy, 0=unhealthy
//!
//! Recording is a no-op until a recorder is installed, so the exporter is
//! optional.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::state::{HealthState, PollOutcome, Transition};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_poll(outcome: &PollOutcome, elapsed: Duration) {
    let label = if outcome.is_success() { "success" } else { "failure" };
    counter!("uptime_polls_total", "outcome" => label).increment(1);
    histogram!("uptime_poll_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_transition(transition: Transition) {
    counter!("uptime_transitions_total", "direction" => transition.as_str()).increment(1);
}

pub fn record_notification(delivered: bool) {
    let label = if delivered { "delivered" } else { "failed" };
    counter!("uptime_notifications_total", "result" => label).increment(1);
}

pub fn set_target_health(state: HealthState) {
    let value = match state {
        HealthState::Healthy => 1.0,
        HealthState::Unhealthy => 0.0,
    };
    gauge!("uptime_target_healthy").set(value);
}
