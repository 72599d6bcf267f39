//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Scheduler (scheduler.rs):
//!     Fixed interval timer
//!     → Probe the target (poller.rs)
//!     → Apply outcome to the tracker (state.rs)
//!     → Dispatch transition, if any, to the notifier
//!
//! Status reads:
//!     → HealthTracker::current() at any time, from any task
//! ```
//!
//! # Design Decisions
//! - One target, one tracker, shared via Arc
//! - A single outcome flips the state; repeats are debounced
//! - Polls never overlap; late ticks are skipped

pub mod poller;
pub mod scheduler;
pub mod state;

pub use poller::{HttpPoller, Probe, SuccessCriterion};
pub use scheduler::Scheduler;
pub use state::{HealthState, HealthTracker, PollOutcome, Transition, TransitionEvent};
