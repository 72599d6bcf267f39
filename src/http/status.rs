//! Status page rendering.
//!
//! Every render reads the tracker directly; nothing is cached between calls.

use std::sync::Arc;

use askama::Template;
use serde::Serialize;

use crate::health::state::{HealthState, HealthTracker};

/// Machine-readable status value shown on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportCode {
    Okay,
    Error,
}

impl ReportCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportCode::Okay => "okay",
            ReportCode::Error => "error",
        }
    }
}

/// Snapshot of the monitor's current belief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub name: String,
    pub message: &'static str,
    pub status_code: ReportCode,
    pub state: HealthState,
}

#[derive(Template)]
#[template(path = "status.html")]
struct StatusPage<'a> {
    name: &'a str,
    message: &'a str,
    status_code: &'a str,
}

/// Read-only view of the tracker for inbound status requests.
#[derive(Debug, Clone)]
pub struct StatusResponder {
    tracker: Arc<HealthTracker>,
    name: Arc<str>,
}

impl StatusResponder {
    pub fn new(tracker: Arc<HealthTracker>, name: impl Into<Arc<str>>) -> Self {
        Self {
            tracker,
            name: name.into(),
        }
    }

    pub fn render(&self) -> StatusReport {
        let state = self.tracker.current();
        let (message, status_code) = match state {
            HealthState::Healthy => ("Gud!", ReportCode::Okay),
            HealthState::Unhealthy => ("Bad!", ReportCode::Error),
        };

        StatusReport {
            name: self.name.to_string(),
            message,
            status_code,
            state,
        }
    }

    /// Render the HTML page for the current state.
    pub fn render_html(&self) -> String {
        let report = self.render();
        let page = StatusPage {
            name: &report.name,
            message: report.message,
            status_code: report.status_code.as_str(),
        };
        page.render().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Status template failed to render");
            format!("{}: {}", report.name, report.message)
        })
    }
}
