//! Target health state machine.
//!
//! # States
//! - Healthy: target answered the last poll successfully (initial state)
//! - Unhealthy: the last poll failed
//!
//! # State Transitions
//! ```text
//! Healthy   → Unhealthy: one Failure outcome  (emits Transition::Down)
//! Unhealthy → Healthy:   one Success outcome  (emits Transition::Recovered)
//! ```
//!
//! Outcomes that confirm the current state emit nothing, so a run of
//! identical outcomes yields at most one event.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Believed health of the target.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy = 0,
    Unhealthy = 1,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            0 => HealthState::Healthy,
            _ => HealthState::Unhealthy,
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthState::Healthy => f.write_str("healthy"),
            HealthState::Unhealthy => f.write_str("unhealthy"),
        }
    }
}

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Success,
    Failure { detail: String },
}

impl PollOutcome {
    pub fn failure(detail: impl Into<String>) -> Self {
        PollOutcome::Failure {
            detail: detail.into(),
        }
    }

    /// State this outcome implies for the target.
    pub fn implied_state(&self) -> HealthState {
        match self {
            PollOutcome::Success => HealthState::Healthy,
            PollOutcome::Failure { .. } => HealthState::Unhealthy,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PollOutcome::Success)
    }
}

/// Direction of a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Healthy → Unhealthy.
    Down,
    /// Unhealthy → Healthy.
    Recovered,
}

impl Transition {
    fn between(from: HealthState, to: HealthState) -> Option<Self> {
        match (from, to) {
            (HealthState::Healthy, HealthState::Unhealthy) => Some(Transition::Down),
            (HealthState::Unhealthy, HealthState::Healthy) => Some(Transition::Recovered),
            _ => None,
        }
    }

    pub fn from_state(&self) -> HealthState {
        match self {
            Transition::Down => HealthState::Healthy,
            Transition::Recovered => HealthState::Unhealthy,
        }
    }

    pub fn to_state(&self) -> HealthState {
        match self {
            Transition::Down => HealthState::Unhealthy,
            Transition::Recovered => HealthState::Healthy,
        }
    }

    /// Metric/log label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Down => "down",
            Transition::Recovered => "recovered",
        }
    }
}

/// A detected state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEvent {
    pub transition: Transition,
    /// When the poll that caused the change was applied.
    pub detected_at: DateTime<Utc>,
    /// Failure detail for down transitions.
    pub cause: Option<String>,
}

/// Holds the single current belief about target health.
///
/// The state lives in one atomic word. `apply` is a single swap, so a
/// concurrent `current` observes either the state before or after a complete
/// apply and never blocks.
#[derive(Debug)]
pub struct HealthTracker {
    state: AtomicU8,
}

impl HealthTracker {
    /// Create a tracker in the optimistic initial state (Healthy).
    pub fn new() -> Self {
        Self::with_state(HealthState::Healthy)
    }

    pub fn with_state(state: HealthState) -> Self {
        Self {
            state: AtomicU8::new(state as u8),
        }
    }

    /// Current belief.
    pub fn current(&self) -> HealthState {
        HealthState::from(self.state.load(Ordering::Acquire))
    }

    pub fn is_healthy(&self) -> bool {
        self.current() == HealthState::Healthy
    }

    /// Apply a poll outcome, returning an event iff the state changed.
    pub fn apply(&self, outcome: PollOutcome) -> Option<TransitionEvent> {
        let next = outcome.implied_state();
        let previous = HealthState::from(self.state.swap(next as u8, Ordering::AcqRel));

        let transition = Transition::between(previous, next)?;
        let cause = match outcome {
            PollOutcome::Failure { detail } => Some(detail),
            PollOutcome::Success => None,
        };

        tracing::info!(
            from = %transition.from_state(),
            to = %transition.to_state(),
            cause = cause.as_deref().unwrap_or(""),
            "Target health changed"
        );

        Some(TransitionEvent {
            transition,
            detected_at: Utc::now(),
            cause,
        })
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;

    fn fail() -> PollOutcome {
        PollOutcome::failure("connection refused")
    }

    fn run(outcomes: Vec<PollOutcome>) -> (Vec<Transition>, Vec<HealthState>) {
        let tracker = HealthTracker::new();
        let mut events = Vec::new();
        let mut states = Vec::new();
        for outcome in outcomes {
            if let Some(event) = tracker.apply(outcome) {
                events.push(event.transition);
            }
            states.push(tracker.current());
        }
        (events, states)
    }

    #[test]
    fn test_starts_healthy() {
        assert_eq!(HealthTracker::new().current(), HealthState::Healthy);
    }

    #[test]
    fn test_steady_success_emits_nothing() {
        let (events, states) = run(vec![PollOutcome::Success; 3]);
        assert!(events.is_empty());
        assert!(states.iter().all(|s| *s == HealthState::Healthy));
    }

    #[test]
    fn test_outage_and_recovery() {
        let (events, states) = run(vec![
            PollOutcome::Success,
            fail(),
            fail(),
            fail(),
            PollOutcome::Success,
        ]);
        assert_eq!(events, vec![Transition::Down, Transition::Recovered]);
        assert_eq!(
            states,
            vec![
                HealthState::Healthy,
                HealthState::Unhealthy,
                HealthState::Unhealthy,
                HealthState::Unhealthy,
                HealthState::Healthy,
            ]
        );
    }

    #[test]
    fn test_first_poll_failure_alerts_once() {
        let (events, _) = run(vec![fail()]);
        assert_eq!(events, vec![Transition::Down]);
    }

    #[test]
    fn test_down_event_carries_cause_and_time() {
        let tracker = HealthTracker::new();
        let before = Utc::now();
        let event = tracker.apply(PollOutcome::failure("HTTP 503")).unwrap();
        assert_eq!(event.transition, Transition::Down);
        assert_eq!(event.cause.as_deref(), Some("HTTP 503"));
        assert!(event.detected_at >= before);

        let event = tracker.apply(PollOutcome::Success).unwrap();
        assert_eq!(event.cause, None);
    }

    #[test]
    fn test_event_iff_state_differs() {
        // Deterministic pseudo-random outcome stream.
        let mut seed: u32 = 0x2545_f491;
        let tracker = HealthTracker::new();
        let mut previous = HealthState::Healthy;
        let mut run_events = 0;

        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let outcome = if seed % 3 == 0 { fail() } else { PollOutcome::Success };
            let implied = outcome.implied_state();

            let event = tracker.apply(outcome);
            assert_eq!(event.is_some(), implied != previous);
            if implied == previous {
                run_events += event.is_some() as usize;
            } else {
                run_events = 1;
            }
            assert!(run_events <= 1);

            assert_eq!(tracker.current(), implied);
            previous = implied;
        }
    }

    #[test]
    fn test_read_after_write_with_concurrent_readers() {
        let tracker = Arc::new(HealthTracker::new());
        let done = Arc::new(AtomicBool::new(false));

        // Each reader counts the state changes it observes.
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let tracker = tracker.clone();
                let done = done.clone();
                thread::spawn(move || {
                    let mut last = tracker.current();
                    let mut changes = 0u32;
                    while !done.load(Ordering::Acquire) {
                        let state = tracker.current();
                        if state != last {
                            changes += 1;
                            last = state;
                        }
                    }
                    if tracker.current() != last {
                        changes += 1;
                        last = tracker.current();
                    }
                    (changes, last)
                })
            })
            .collect();

        // Repeated outcomes make half of the applies no-ops.
        let mut transitions = 0u32;
        for i in 0..2_000 {
            let outcome = if (i / 2) % 2 == 0 { fail() } else { PollOutcome::Success };
            let expected = outcome.implied_state();
            if tracker.apply(outcome).is_some() {
                transitions += 1;
            }
            assert_eq!(tracker.current(), expected);
        }
        done.store(true, Ordering::Release);

        assert_eq!(transitions, 1_000);
        for reader in readers {
            let (changes, last) = reader.join().unwrap();
            assert!(changes <= transitions, "{changes} changes seen, {transitions} applied");
            assert_eq!(last, tracker.current());
        }
    }
}
