//! Uptime Monitor
//!
//! Polls one target endpoint on a fixed schedule, posts to a webhook when the
//! target goes down or comes back, and serves the current belief on
//! `GET /status`.
//!
//! # Architecture Overview
//!
//! ```text
//!      ┌───────────────────────────────────────────────────────────┐
//!      │                       UPTIME MONITOR                      │
//!      │                                                           │
//!      │  ┌───────────┐    ┌──────────┐    ┌─────────────────┐     │
//!      │  │ scheduler │───▶│  poller  │───▶│ health tracker  │     │     Target
//!      │  │  (tick)   │    │ GET url  │◀───┼──────────────┐  │◀────┼──── Endpoint
//!      │  └───────────┘    └──────────┘    │ apply/current│  │     │
//!      │                                   └──────┬───────┴──┘     │
//!      │                          transition │    │ current()      │
//!      │                                     ▼    ▼                │
//!      │                        ┌────────────┐  ┌──────────────┐   │
//!      │   Webhook ◀────────────┤ dispatcher │  │ /status page │◀──┼──── Client
//!      │                        │ + notifier │  │   (axum)     │   │
//!      │                        └────────────┘  └──────────────┘   │
//!      └───────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use uptime_monitor::config::{self, ConfigError};
use uptime_monitor::lifecycle::signals::spawn_signal_listener;
use uptime_monitor::lifecycle::{Monitor, Shutdown};
use uptime_monitor::observability::{logging, metrics};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging("info");
            report_config_error(&e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("uptime-monitor v{} starting", env!("CARGO_PKG_VERSION"));

    let monitor = match Monitor::new(&config) {
        Ok(monitor) => monitor,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    if let Some(addr) = config.observability.metrics_address.as_deref() {
        match addr.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(metrics_address = %addr, error = %e, "Failed to parse metrics address"),
        }
    }

    let listener = match monitor.bind().await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    if let Err(e) = monitor.run(listener, &shutdown).await {
        tracing::error!(error = %e, "Monitor stopped with error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}

fn report_config_error(error: &ConfigError) {
    match error {
        ConfigError::Validation(errors) => {
            for e in errors {
                tracing::error!(problem = %e, "Invalid configuration");
            }
        }
        other => tracing::error!(error = %other, "Could not load configuration"),
    }
}
