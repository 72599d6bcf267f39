//! Transition notifications.
//!
//! # Data Flow
//! ```text
//! Scheduler tick detects TransitionEvent
//!     → dispatcher.rs (queue, preserves detection order; tick never waits)
//!     → message.rs (format down alert / recovery)
//!     → webhook.rs (POST JSON to the webhook URL)
//! ```
//!
//! # Design Decisions
//! - Best-effort delivery: failures are logged and dropped
//! - No retries, no persistence of undelivered events
//! - Only down alerts carry the mention

pub mod dispatcher;
pub mod message;
pub mod webhook;

use std::future::Future;

use thiserror::Error;

use crate::health::state::TransitionEvent;

pub use dispatcher::{Dispatcher, NotificationDispatcher};
pub use message::{MessageTemplate, WebhookMessage};
pub use webhook::WebhookNotifier;

/// Errors produced while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook returned HTTP {0}")]
    Status(u16),
}

/// Delivers a transition event to some external channel.
pub trait Notify: Send + Sync + 'static {
    fn notify(&self, event: &TransitionEvent) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
