//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::MonitorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable names.
pub mod env {
    pub const CONFIG_FILE: &str = "MONITOR_CONFIG";
    pub const BOT_STATUS_API: &str = "BOT_STATUS_API";
    pub const WEBHOOK_URL: &str = "WEBHOOK_URL";
    pub const CRON_INTERVAL: &str = "CRON_INTERVAL";
    pub const MENTION: &str = "MENTION";
    pub const BOT_NAME: &str = "BOT_NAME";
    pub const AVATAR_URL: &str = "AVATAR_URL";
    pub const PORT: &str = "PORT";
    pub const BIND_HOST: &str = "BIND_HOST";
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    pub const EXPECT_STATUS: &str = "EXPECT_STATUS";
    pub const EXPECT_BODY: &str = "EXPECT_BODY";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const METRICS_ADDRESS: &str = "METRICS_ADDRESS";
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{setting} is not a valid number: '{value}'")]
    Number { setting: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let config = read_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration from the process environment.
///
/// When `MONITOR_CONFIG` names a TOML file it is read first; environment
/// variables then override individual settings.
pub fn load_from_env() -> Result<MonitorConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_with<F>(lookup: F) -> Result<MonitorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let mut config = match lookup(env::CONFIG_FILE) {
        Some(path) => read_file(Path::new(&path))?,
        None => MonitorConfig::default(),
    };

    if let Some(v) = lookup(env::BOT_STATUS_API) {
        config.target.url = v;
    }
    if let Some(v) = lookup(env::WEBHOOK_URL) {
        config.webhook.url = v;
    }
    if let Some(v) = lookup(env::CRON_INTERVAL) {
        config.schedule.interval = v;
    }
    if let Some(v) = lookup(env::MENTION) {
        config.webhook.mention = Some(v);
    }
    if let Some(v) = lookup(env::BOT_NAME) {
        config.name = v;
    }
    if let Some(v) = lookup(env::AVATAR_URL) {
        config.webhook.avatar_url = Some(v);
    }
    if let Some(v) = lookup(env::PORT) {
        config.listener.port = parse_number(env::PORT, &v)?;
    }
    if let Some(v) = lookup(env::BIND_HOST) {
        config.listener.host = v;
    }
    if let Some(v) = lookup(env::REQUEST_TIMEOUT_SECS) {
        config.target.timeout_secs = parse_number(env::REQUEST_TIMEOUT_SECS, &v)?;
    }
    if let Some(v) = lookup(env::EXPECT_STATUS) {
        config.target.expect_status = Some(parse_number(env::EXPECT_STATUS, &v)?);
    }
    if let Some(v) = lookup(env::EXPECT_BODY) {
        config.target.expect_body = Some(v);
    }
    if let Some(v) = lookup(env::LOG_LEVEL) {
        config.observability.log_level = v;
    }
    if let Some(v) = lookup(env::METRICS_ADDRESS) {
        config.observability.metrics_address = Some(v);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn parse_number<T: std::str::FromStr>(setting: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Number {
        setting,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        (env::BOT_STATUS_API, "http://127.0.0.1:9000/health"),
        (env::WEBHOOK_URL, "https://discord.test/api/webhooks/1/token"),
    ];

    #[test]
    fn test_defaults_apply() {
        let config = load_with(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.name, "Bot");
        assert_eq!(config.schedule.interval, "*/30 * * * *");
        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.webhook.mention, None);
        assert_eq!(config.target.timeout_secs, 10);
    }

    #[test]
    fn test_missing_target_is_fatal() {
        let err = load_with(lookup(&[REQUIRED[1]])).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::Missing(env::BOT_STATUS_API)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_webhook_is_fatal() {
        let err = load_with(lookup(&[REQUIRED[0]])).unwrap_err();
        assert!(err.to_string().contains(env::WEBHOOK_URL));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let err = load_with(lookup(&[(env::BOT_STATUS_API, "  "), REQUIRED[1]])).unwrap_err();
        assert!(err.to_string().contains(env::BOT_STATUS_API));
    }

    #[test]
    fn test_env_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            (env::CRON_INTERVAL, "*/5 * * * *"),
            (env::MENTION, "1234"),
            (env::BOT_NAME, "Hyperion"),
            (env::PORT, "8088"),
            (env::REQUEST_TIMEOUT_SECS, "3"),
            (env::EXPECT_STATUS, "204"),
        ]);
        let config = load_with(lookup(&vars)).unwrap();
        assert_eq!(config.schedule.interval, "*/5 * * * *");
        assert_eq!(config.webhook.mention.as_deref(), Some("1234"));
        assert_eq!(config.name, "Hyperion");
        assert_eq!(config.listener.port, 8088);
        assert_eq!(config.target.timeout_secs, 3);
        assert_eq!(config.target.expect_status, Some(204));
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push((env::PORT, "eighty"));
        let err = load_with(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Number { setting: "PORT", .. }));
    }

    #[test]
    fn test_file_layer_under_env() {
        let path = std::env::temp_dir().join(format!("uptime-monitor-{}.toml", std::process::id()));
        fs::write(
            &path,
            r#"
name = "FromFile"

[target]
url = "http://file.test/health"
timeout_secs = 4

[webhook]
url = "https://discord.test/api/webhooks/file"
"#,
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config = load_with(lookup(&[
            (env::CONFIG_FILE, path_str.as_str()),
            (env::BOT_NAME, "FromEnv"),
        ]))
        .unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(config.name, "FromEnv");
        assert_eq!(config.target.url, "http://file.test/health");
        assert_eq!(config.target.timeout_secs, 4);
        assert_eq!(config.listener.port, 3000);
    }
}
