//! Uptime Monitor Library

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod notify;
pub mod observability;

pub use config::schema::MonitorConfig;
pub use health::{HealthState, HealthTracker, PollOutcome, Transition, TransitionEvent};
pub use lifecycle::{Monitor, Shutdown};
