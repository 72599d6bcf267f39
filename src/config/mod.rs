//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (MONITOR_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (BOT_STATUS_API, WEBHOOK_URL, ...)
//!     → validation.rs (semantic checks, schedule.rs for CRON_INTERVAL)
//!     → MonitorConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields except the two URLs have defaults
//! - Every validation problem is reported at once, then startup aborts

pub mod loader;
pub mod schedule;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, ConfigError};
pub use schema::{
    ListenerConfig, MonitorConfig, ObservabilityConfig, ScheduleConfig, TargetConfig,
    WebhookConfig,
};
