//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check required settings are present
//! - Validate URLs, the schedule expression and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::loader::env;
use crate::config::schedule::{parse_interval, IntervalError};
use crate::config::schema::MonitorConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required setting is absent.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A URL setting could not be parsed or uses a non-HTTP scheme.
    #[error("invalid URL in {setting}: {reason}")]
    InvalidUrl { setting: &'static str, reason: String },

    /// The schedule expression was rejected.
    #[error("invalid CRON_INTERVAL: {0}")]
    Schedule(IntervalError),

    /// A numeric setting is out of range.
    #[error("invalid {setting}: {reason}")]
    OutOfRange { setting: &'static str, reason: String },
}

/// Upper bound on `REQUEST_TIMEOUT_SECS`.
pub const MAX_TIMEOUT_SECS: u64 = 60 * 60;

/// Validate the whole configuration, collecting every problem.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = check_url(env::BOT_STATUS_API, &config.target.url) {
        errors.push(e);
    }
    if let Err(e) = check_url(env::WEBHOOK_URL, &config.webhook.url) {
        errors.push(e);
    }

    if let Err(e) = parse_interval(&config.schedule.interval) {
        errors.push(ValidationError::Schedule(e));
    }

    if config.target.timeout_secs == 0 {
        errors.push(ValidationError::OutOfRange {
            setting: env::REQUEST_TIMEOUT_SECS,
            reason: "timeout must be greater than zero".to_string(),
        });
    } else if config.target.timeout_secs > MAX_TIMEOUT_SECS {
        errors.push(ValidationError::OutOfRange {
            setting: env::REQUEST_TIMEOUT_SECS,
            reason: format!("timeout must be at most {} seconds", MAX_TIMEOUT_SECS),
        });
    }

    if let Some(code) = config.target.expect_status {
        if !(100..=599).contains(&code) {
            errors.push(ValidationError::OutOfRange {
                setting: env::EXPECT_STATUS,
                reason: format!("{} is not an HTTP status code", code),
            });
        }
    }

    if let Some(avatar) = config.webhook.avatar_url.as_deref() {
        if let Err(e) = check_url(env::AVATAR_URL, avatar) {
            errors.push(e);
        }
    }

    if let Some(addr) = config.observability.metrics_address.as_deref() {
        if addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(ValidationError::OutOfRange {
                setting: env::METRICS_ADDRESS,
                reason: format!("'{}' is not a socket address", addr),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a required HTTP(S) URL setting.
pub fn parse_http_url(setting: &'static str, raw: &str) -> Result<Url, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Missing(setting));
    }

    let url = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
        setting,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::InvalidUrl {
            setting,
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn check_url(setting: &'static str, raw: &str) -> Result<(), ValidationError> {
    parse_http_url(setting, raw).map(|_| ())
}
