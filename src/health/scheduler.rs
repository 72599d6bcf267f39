//! Periodic polling.
//!
//! # Responsibilities
//! - Probe the target once per interval
//! - Feed the outcome to the tracker
//! - Hand any transition to the notification dispatcher
//!
//! # Design Decisions
//! - The poll runs inline in the tick loop, so two checks never overlap;
//!   ticks missed while a poll is outstanding are skipped
//! - Every poll has an upper bound; overrunning it counts as a failure
//! - The first poll happens immediately at startup

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::health::poller::Probe;
use crate::health::state::{HealthTracker, PollOutcome, TransitionEvent};
use crate::notify::Dispatcher;
use crate::observability::metrics;

pub struct Scheduler<P> {
    probe: P,
    tracker: Arc<HealthTracker>,
    dispatcher: Dispatcher,
    interval: Duration,
    poll_timeout: Duration,
}

impl<P: Probe> Scheduler<P> {
    pub fn new(
        probe: P,
        tracker: Arc<HealthTracker>,
        dispatcher: Dispatcher,
        interval: Duration,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            probe,
            tracker,
            dispatcher,
            interval,
            poll_timeout,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            poll_timeout_ms = self.poll_timeout.as_millis() as u64,
            "Scheduler starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tokio::select! {
                        _ = self.tick() => {}
                        _ = shutdown.recv() => {
                            tracing::info!("Scheduler received shutdown signal, abandoning poll");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run one poll-and-decide cycle.
    pub async fn tick(&self) -> Option<TransitionEvent> {
        let started = Instant::now();
        let outcome = match time::timeout(self.poll_timeout, self.probe.check()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(timeout = ?self.poll_timeout, "Poll exceeded its time bound");
                PollOutcome::failure(format!("poll exceeded {:?}", self.poll_timeout))
            }
        };
        metrics::record_poll(&outcome, started.elapsed());

        let event = self.tracker.apply(outcome);
        metrics::set_target_health(self.tracker.current());

        if let Some(event) = &event {
            metrics::record_transition(event.transition);
            self.dispatcher.dispatch(event.clone());
        }
        event
    }
}
