//! Target polling.
//!
//! # Responsibilities
//! - Issue one GET against the target per check
//! - Collapse every response, error and timeout into Success/Failure
//!
//! # Design Decisions
//! - No retries here; the schedule is the retry policy
//! - Success criterion is configurable (exact status, body substring)

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::TargetConfig;
use crate::health::state::PollOutcome;

/// A single health check against some target.
pub trait Probe: Send + Sync {
    fn check(&self) -> impl Future<Output = PollOutcome> + Send;
}

/// What a response must look like to count as reachable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuccessCriterion {
    /// Exact status required; any 2xx when unset.
    pub status: Option<u16>,
    /// Substring the body must contain.
    pub body_contains: Option<String>,
}

impl SuccessCriterion {
    pub fn from_config(config: &TargetConfig) -> Self {
        Self {
            status: config.expect_status,
            body_contains: config.expect_body.clone(),
        }
    }

    fn status_ok(&self, status: StatusCode) -> bool {
        match self.status {
            Some(expected) => status.as_u16() == expected,
            None => status.is_success(),
        }
    }
}

/// HTTP poller backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpPoller {
    client: Client,
    target: Url,
    timeout: Duration,
    criterion: SuccessCriterion,
}

impl HttpPoller {
    pub fn new(target: Url, timeout: Duration, criterion: SuccessCriterion) -> Self {
        let client = Client::builder()
            .user_agent(concat!("uptime-monitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });

        Self {
            client,
            target,
            timeout,
            criterion,
        }
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run_check(&self) -> PollOutcome {
        let response = match self
            .client
            .get(self.target.clone())
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::warn!(url = %self.target, "Health check failed: timeout");
                return PollOutcome::failure(format!("timed out after {:?}", self.timeout));
            }
            Err(e) => {
                tracing::warn!(url = %self.target, error = %e, "Health check failed: connection error");
                return PollOutcome::failure(format!("connection error: {}", e));
            }
        };

        let status = response.status();
        if !self.criterion.status_ok(status) {
            tracing::warn!(url = %self.target, status = %status, "Health check failed: unexpected status");
            return PollOutcome::failure(format!("unexpected status {}", status));
        }

        let Some(needle) = self.criterion.body_contains.as_deref() else {
            return PollOutcome::Success;
        };

        match response.text().await {
            Ok(body) if body.contains(needle) => PollOutcome::Success,
            Ok(_) => {
                tracing::warn!(url = %self.target, expected = needle, "Health check failed: body mismatch");
                PollOutcome::failure(format!("response body does not contain '{}'", needle))
            }
            Err(e) => {
                tracing::warn!(url = %self.target, error = %e, "Health check failed: body read error");
                PollOutcome::failure(format!("failed to read body: {}", e))
            }
        }
    }
}

impl Probe for HttpPoller {
    async fn check(&self) -> PollOutcome {
        let outcome = self.run_check().await;
        if outcome.is_success() {
            tracing::debug!(url = %self.target, "Health check passed");
        }
        outcome
    }
}
