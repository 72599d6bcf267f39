//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn validated configuration into runtime components
//! - Bind the status listener
//! - Start background tasks (dispatcher, scheduler) and serve
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound before the scheduler starts; nothing runs if the
//!   configuration is rejected

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::loader::env;
use crate::config::schedule::parse_interval;
use crate::config::validation::{parse_http_url, validate_config, ValidationError};
use crate::config::{ConfigError, MonitorConfig};
use crate::health::{HealthTracker, HttpPoller, Scheduler, SuccessCriterion};
use crate::http::{StatusResponder, StatusServer};
use crate::lifecycle::Shutdown;
use crate::notify::{MessageTemplate, NotificationDispatcher, WebhookNotifier};

/// Extra time the scheduler allows beyond the HTTP timeout before it gives
/// up on a poll itself.
const POLL_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Failed to bind status listener on {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("Status server failed: {0}")]
    Serve(std::io::Error),
}

/// A fully configured monitor, ready to run.
pub struct Monitor {
    name: String,
    tracker: Arc<HealthTracker>,
    poller: HttpPoller,
    notifier: WebhookNotifier,
    interval: Duration,
    request_timeout: Duration,
    bind_address: String,
}

impl Monitor {
    pub fn new(config: &MonitorConfig) -> Result<Self, StartupError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let target = parse_http_url(env::BOT_STATUS_API, &config.target.url)?;
        let webhook = parse_http_url(env::WEBHOOK_URL, &config.webhook.url)?;
        let interval = parse_interval(&config.schedule.interval).map_err(ValidationError::Schedule)?;
        let request_timeout = Duration::from_secs(config.target.timeout_secs);

        if request_timeout >= interval {
            tracing::warn!(
                timeout_secs = request_timeout.as_secs(),
                interval_secs = interval.as_secs(),
                "Request timeout is not shorter than the poll interval; late ticks will be skipped"
            );
        }

        let name = config.display_name().to_string();
        let poller = HttpPoller::new(
            target,
            request_timeout,
            SuccessCriterion::from_config(&config.target),
        );
        let template = MessageTemplate::new(name.clone())
            .with_mention(config.webhook.mention.clone())
            .with_avatar(config.webhook.avatar_url.clone());
        let notifier = WebhookNotifier::new(webhook, template, request_timeout);

        tracing::info!(
            name = %name,
            url = %poller.target(),
            interval_secs = interval.as_secs(),
            timeout_secs = request_timeout.as_secs(),
            mention = config.webhook.mention.is_some(),
            "Configuration loaded"
        );

        Ok(Self {
            name,
            tracker: Arc::new(HealthTracker::new()),
            poller,
            notifier,
            interval,
            request_timeout,
            bind_address: config.listener.bind_address(),
        })
    }

    pub fn tracker(&self) -> Arc<HealthTracker> {
        self.tracker.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Bind the configured status listener address.
    pub async fn bind(&self) -> Result<TcpListener, StartupError> {
        TcpListener::bind(&self.bind_address)
            .await
            .map_err(|source| StartupError::Bind {
                address: self.bind_address.clone(),
                source,
            })
    }

    /// Run until `shutdown` fires or the server fails.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), StartupError> {
        let dispatcher_shutdown = shutdown.subscribe();
        let scheduler_shutdown = shutdown.subscribe();
        let server_shutdown = shutdown.subscribe();

        let (dispatch_task, dispatcher) = NotificationDispatcher::new(self.notifier);
        let dispatch_handle = tokio::spawn(dispatch_task.run(dispatcher_shutdown));

        let scheduler = Scheduler::new(
            self.poller,
            self.tracker.clone(),
            dispatcher,
            self.interval,
            self.request_timeout.saturating_add(POLL_GRACE),
        );
        let scheduler_handle = tokio::spawn(scheduler.run(scheduler_shutdown));

        let server = StatusServer::new(
            StatusResponder::new(self.tracker, self.name),
            self.request_timeout,
        );
        let result = server
            .run(listener, server_shutdown)
            .await
            .map_err(StartupError::Serve);

        // Stop background tasks if the server ended on its own.
        shutdown.trigger();
        if let Err(e) = scheduler_handle.await {
            tracing::error!(error = %e, "Scheduler task failed");
        }
        if let Err(e) = dispatch_handle.await {
            tracing::error!(error = %e, "Dispatcher task failed");
        }

        result
    }
}
