//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits so a TOML file can provide a base layer that
//! environment variables then override.

use serde::{Deserialize, Serialize};

/// Root configuration for the uptime monitor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Display name of the monitored system.
    pub name: String,

    /// Target endpoint that is polled every tick.
    pub target: TargetConfig,

    /// Poll schedule.
    pub schedule: ScheduleConfig,

    /// Outbound notification webhook.
    pub webhook: WebhookConfig,

    /// Status page listener.
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            target: TargetConfig::default(),
            schedule: ScheduleConfig::default(),
            webhook: WebhookConfig::default(),
            listener: ListenerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Target endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Health-check URL (required).
    pub url: String,

    /// Outbound request timeout in seconds.
    pub timeout_secs: u64,

    /// Exact status code that counts as success. Any 2xx when unset.
    pub expect_status: Option<u16>,

    /// Substring the response body must contain to count as success.
    pub expect_body: Option<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: 10,
            expect_status: None,
            expect_body: None,
        }
    }
}

/// Poll schedule configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Schedule expression, see [`crate::config::schedule::parse_interval`].
    pub interval: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval: "*/30 * * * *".to_string(),
        }
    }
}

/// Webhook configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook URL (required).
    pub url: String,

    /// User id mentioned on down alerts.
    pub mention: Option<String>,

    /// Avatar shown next to webhook messages.
    pub avatar_url: Option<String>,
}

/// Status page listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g., "0.0.0.0").
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) used when RUST_LOG is unset.
    pub log_level: String,

    /// Prometheus exporter bind address. Exporter is disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}

impl MonitorConfig {
    /// Configuration with the given required URLs and everything else defaulted.
    pub fn new(target_url: impl Into<String>, webhook_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.target.url = target_url.into();
        config.webhook.url = webhook_url.into();
        config
    }

    /// Display name, falling back to the generic default.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            DEFAULT_NAME
        } else {
            &self.name
        }
    }
}

/// Name used when none is configured.
pub const DEFAULT_NAME: &str = "Bot";
