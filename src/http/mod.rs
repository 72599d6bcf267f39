//! Status page subsystem.
//!
//! # Data Flow
//! ```text
//! GET /status
//!     → server.rs (request ID, trace, timeout, no-store)
//!     → status.rs (read tracker, build StatusReport)
//!     → HTML page (templates/status.html) or JSON
//! ```

pub mod server;
pub mod status;

pub use server::StatusServer;
pub use status::{ReportCode, StatusReport, StatusResponder};
