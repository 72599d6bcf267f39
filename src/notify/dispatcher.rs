//! Detached notification delivery.
//!
//! The scheduler hands events to a [`Dispatcher`] and moves on. A single
//! [`NotificationDispatcher`] task drains the queue, so events are delivered
//! in the order they were detected, and a slow webhook never delays a tick.

use tokio::sync::{broadcast, mpsc};

use crate::health::state::TransitionEvent;
use crate::notify::Notify;
use crate::observability::metrics;

/// Sending half handed to the scheduler.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<TransitionEvent>,
}

impl Dispatcher {
    /// Queue an event for delivery. Never blocks.
    pub fn dispatch(&self, event: TransitionEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::warn!(
                transition = e.0.transition.as_str(),
                "Notification dispatcher stopped, dropping event"
            );
        }
    }
}

/// Background task delivering queued events through a [`Notify`] impl.
pub struct NotificationDispatcher<N> {
    notifier: N,
    rx: mpsc::UnboundedReceiver<TransitionEvent>,
}

impl<N: Notify> NotificationDispatcher<N> {
    pub fn new(notifier: N) -> (Self, Dispatcher) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { notifier, rx }, Dispatcher { tx })
    }

    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!("Notification dispatcher starting");

        loop {
            tokio::select! {
                event = self.rx.recv() => {
                    match event {
                        Some(event) => self.deliver(event).await,
                        None => break,
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Notification dispatcher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn deliver(&self, event: TransitionEvent) {
        match self.notifier.notify(&event).await {
            Ok(()) => {
                tracing::info!(
                    transition = event.transition.as_str(),
                    detected_at = %event.detected_at,
                    "Notification sent"
                );
                metrics::record_notification(true);
            }
            Err(e) => {
                tracing::error!(
                    transition = event.transition.as_str(),
                    error = %e,
                    "Could not deliver notification"
                );
                metrics::record_notification(false);
            }
        }
    }
}
