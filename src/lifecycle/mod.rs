//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Build tracker, poller, notifier → Bind status listener
//!     → Spawn dispatcher and scheduler → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → scheduler, dispatcher, server exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any configuration problem is fatal before anything starts
//! - In-flight polls and deliveries are abandoned on shutdown

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Monitor, StartupError};
